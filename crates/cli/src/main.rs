use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use medchain_core::constants::{PATIENT_HEIGHT_FIELD, PATIENT_WEIGHT_FIELD};
use medchain_core::intake::check_measurement;
use medchain_core::{
    report, Address, ChainClient, FormKind, GatewayConfig, Gender, HospitalRecord,
    IntakeError, MedicalRecordRequest, NonEmptyText, PatientRecord, SubmissionGateway,
    SubmissionRecord,
};
use medchain_rpc::JsonRpcClient;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "medchain")]
#[command(about = "Submit hospital, patient and medical record data to the MedChain contracts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the accounts the node can sign for
    Accounts,
    /// Store hospital details
    Hospital {
        id: NonEmptyText,
        name: NonEmptyText,
        address: NonEmptyText,
        specialization: NonEmptyText,
    },
    /// Store patient details
    Patient {
        id: NonEmptyText,
        name: NonEmptyText,
        age: u32,
        /// M, F or other
        gender: Gender,
        height: f64,
        weight: f64,
        address: NonEmptyText,
        phone: NonEmptyText,
        email: NonEmptyText,
        /// Admission date (YYYY-MM-DD)
        admission_date: NaiveDate,
    },
    /// Create a medical record for a patient
    Record { patient_id: NonEmptyText },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'medchain --help' for commands");
        return Ok(());
    };

    let cfg = Arc::new(GatewayConfig::from_lookup(|key| std::env::var(key).ok())?);
    let client = Arc::new(JsonRpcClient::from_config(&cfg));

    let (form, record): (FormKind, Result<SubmissionRecord, IntakeError>) = match command {
        Commands::Accounts => {
            let accounts = list_accounts(client.as_ref(), cfg.call_timeout()).await?;
            if accounts.is_empty() {
                println!("No accounts found.");
            }
            for account in accounts {
                println!("{account}");
            }
            return Ok(());
        }
        Commands::Hospital {
            id,
            name,
            address,
            specialization,
        } => (
            FormKind::Hospital,
            Ok(HospitalRecord {
                id,
                name,
                address,
                specialization,
            }
            .into()),
        ),
        Commands::Patient {
            id,
            name,
            age,
            gender,
            height,
            weight,
            address,
            phone,
            email,
            admission_date,
        } => (
            FormKind::Patient,
            patient_record(PatientRecord {
                id,
                name,
                age,
                gender,
                height,
                weight,
                address,
                phone,
                email,
                admission_date,
            }),
        ),
        Commands::Record { patient_id } => (
            FormKind::MedicalRecord,
            Ok(MedicalRecordRequest { patient_id }.into()),
        ),
    };

    let gateway = SubmissionGateway::new(cfg, client);
    let result = match record {
        Ok(record) => gateway.submit(record).await,
        Err(e) => Err(e.into()),
    };
    let notice = report(form, &result);

    if notice.is_success() {
        println!("{}", notice.message);
        if let Some(tx) = &notice.transaction_hash {
            println!("Transaction: {tx}");
        }
        Ok(())
    } else {
        eprintln!("{}", notice.message);
        std::process::exit(1);
    }
}

/// Apply the form's measurement rule to values clap already parsed.
fn patient_record(record: PatientRecord) -> Result<SubmissionRecord, IntakeError> {
    check_measurement(PATIENT_HEIGHT_FIELD, record.height)?;
    check_measurement(PATIENT_WEIGHT_FIELD, record.weight)?;
    Ok(record.into())
}

async fn list_accounts(client: &dyn ChainClient, timeout: Duration) -> anyhow::Result<Vec<Address>> {
    match tokio::time::timeout(timeout, client.accounts()).await {
        Ok(accounts) => Ok(accounts?),
        Err(_) => anyhow::bail!("node did not list accounts within {}s", timeout.as_secs()),
    }
}
