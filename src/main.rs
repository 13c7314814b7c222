//! Maintenance entry point.
//!
//! Connects to the engine database, applies pending migrations and audits the paper
//! claim ledger of every catalog. Exits with status 1 when any anomaly is found so
//! the run can gate deployments or alert from a cron job.

use entity::sea_orm_active_enums::TestType;
use sea_orm::Iterable;
use tracing::{error, info};

use entitlement_engine::{
    config::Config, error::AppError, service::ledger::LedgerService, startup,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    startup::init_tracing(&config);

    let db = startup::connect_to_database(&config).await?;
    let ledger = LedgerService::new(&db);

    info!("Auditing paper claims");

    let mut anomaly_count = 0;
    for test_type in TestType::iter() {
        let anomalies = ledger.audit_claims(test_type).await?;

        if anomalies.is_empty() {
            info!("{:?} catalog: no claim anomalies", test_type);
        } else {
            error!(
                "{:?} catalog: {} claim anomalies",
                test_type,
                anomalies.len()
            );
        }

        anomaly_count += anomalies.len();
    }

    if anomaly_count > 0 {
        error!("Claim audit found {} anomalies", anomaly_count);
        std::process::exit(1);
    }

    info!("Claim audit passed");

    Ok(())
}
