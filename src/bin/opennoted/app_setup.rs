use std::net::IpAddr;
use async_trait::async_trait;
use log::{error, info, warn};
use opennote::config::app_config::AppConfig;
use opennote::identity::{ForwardedIdentityGateway, IdentityGateway};
use opennote::note_store::{NoteStore, ProductionNoteStore};
use opennote::rng::SyncRng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rocket::fairing::{Fairing, Info};
use rocket::figment::Figment;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;
use crate::routes::{ApiRocketBuildExt, WebRocketBuildExt};

pub fn build_rocket(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(Template::fairing())
        .attach(AppSetupFairing)
}

pub struct AppSetupFairing;

/// Whether clients other than a proxy on the same host can reach the service
/// and forge the identity headers.
fn listens_beyond_loopback(address: IpAddr) -> bool {
    !address.is_loopback()
}

macro_rules! ok_or_bail {
    ($rocket:ident, $expr:expr, |$e:ident| $error_logger:expr) => ({
        match $expr {
            std::result::Result::Ok(ok) => ok,
            std::result::Result::Err(e) => {
                let $e = e;
                $error_logger;
                return std::result::Result::Err($rocket);
            },
        }
    });
}

#[async_trait]
impl Fairing for AppSetupFairing {
    fn info(&self) -> Info {
        use rocket::fairing::Kind;
        Info {
            name: "app setup",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(
        &self,
        rocket: Rocket<Build>,
    ) -> rocket::fairing::Result {
        let config: AppConfig = ok_or_bail!(
            rocket,
            rocket.figment().extract(),
            |e| {
                for e in e {
                    error!("{e}");
                }
                info!("finishing due to a config parse error");
            }
        );

        let rng = ok_or_bail!(
            rocket,
            StdRng::try_from_os_rng(),
            |e| error!("failed to seed the rng from the os: {e}")
        );

        let note_store: Box<dyn NoteStore> = Box::new(
            ok_or_bail!(
                rocket,
                ProductionNoteStore::new(&config, SyncRng::new(rng)).await,
                |e| error!("note store initialization failed: {e}")
            )
        );

        let address = rocket.figment().extract_inner::<IpAddr>(rocket::Config::ADDRESS);
        if let Some(address) = address.ok().filter(|address| listens_beyond_loopback(*address)) {
            warn!(
                "listening on {address}, identity is taken from the {} header \
                    as is: only the authenticating proxy must be able to connect",
                config.identity.principal_id_header,
            );
        }

        let identity_gateway: Box<dyn IdentityGateway> = Box::new(
            ForwardedIdentityGateway::new(config.identity.clone())
        );

        Ok(
            rocket
                .manage(note_store)
                .manage(identity_gateway)
                .manage(config)
                .install_opennote_api()
                .install_opennote_web()
        )
    }
}
