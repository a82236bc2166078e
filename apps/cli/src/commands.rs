use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use alert_cell::{AlertFeed, AlertFilter, AlertMonitor, AlertService, FeedScope, DEFAULT_FEED_LIMIT};
use analytics_cell::{AnalyticsService, PatientDashboard};
use assistant_cell::{AssistantService, ChatTranscript};
use patient_cell::{
    DetailServices, DetailState, GenderFilter, IdentityForm, PatientDetail, PatientRegistry,
    PatientService, RegistrationWizard, SortField, SortOrder,
};
use shared_config::AppConfig;
use shared_models::{Gender, PatientUpdate};
use vitals_cell::{VitalField, VitalsForm, VitalsService, DEFAULT_HISTORY_LIMIT};

use crate::render;

#[derive(Parser)]
#[command(name = "smart-health", version, about = "Smart Health patient monitoring client")]
pub struct Cli {
    /// Base URL of the Smart Health API; overrides API_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse and manage the patient registry
    #[command(subcommand)]
    Patients(PatientCommand),
    /// Register a new patient together with a first set of vitals
    Register(RegisterArgs),
    #[command(subcommand)]
    Vitals(VitalsCommand),
    #[command(subcommand)]
    Alerts(AlertCommand),
    /// Ask the virtual health assistant a question; without one, list suggestions
    Ask {
        question: Option<String>,
        #[arg(long)]
        patient: Option<String>,
    },
    /// Show the analytics aggregate for a patient
    Analytics { patient_id: String },
    /// Show a patient's own dashboard
    Dashboard { patient_id: String },
}

#[derive(Subcommand, Debug)]
pub enum PatientCommand {
    List {
        /// Matches name, medical history or contact
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        gender: GenderFilter,
        /// Defaults to newest first when neither --sort nor --order is given
        #[arg(long)]
        sort: Option<SortField>,
        #[arg(long)]
        order: Option<SortOrder>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Show {
        id: String,
    },
    Create(IdentityArgs),
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        gender: Option<Gender>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        history: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct IdentityArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: String,
    #[arg(long)]
    gender: Gender,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    history: Option<String>,
}

impl From<IdentityArgs> for IdentityForm {
    fn from(args: IdentityArgs) -> Self {
        IdentityForm {
            name: args.name,
            age: args.age,
            gender: Some(args.gender),
            contact: args.contact.unwrap_or_default(),
            medical_history: args.history.unwrap_or_default(),
        }
    }
}

#[derive(Args, Debug)]
pub struct ReadingArgs {
    #[arg(long)]
    heart_rate: String,
    #[arg(long)]
    systolic: String,
    #[arg(long)]
    diastolic: String,
    #[arg(long)]
    temperature: String,
    #[arg(long)]
    spo2: String,
}

impl ReadingArgs {
    fn fill(self, form: &mut VitalsForm) {
        form.set(VitalField::HeartRate, self.heart_rate);
        form.set(VitalField::Systolic, self.systolic);
        form.set(VitalField::Diastolic, self.diastolic);
        form.set(VitalField::Temperature, self.temperature);
        form.set(VitalField::OxygenSaturation, self.spo2);
    }
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[command(flatten)]
    identity: IdentityArgs,
    #[command(flatten)]
    reading: ReadingArgs,
}

#[derive(Subcommand, Debug)]
pub enum VitalsCommand {
    /// Recent readings, newest first
    History {
        patient_id: String,
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },
    /// Normal reference range for each reading
    Ranges,
    /// Log a reading and show its risk assessment
    Submit {
        patient_id: String,
        #[command(flatten)]
        reading: ReadingArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum AlertCommand {
    List {
        #[arg(long)]
        patient: Option<String>,
        /// Include acknowledged alerts
        #[arg(long)]
        all: bool,
    },
    Ack {
        id: String,
    },
    /// Keep refreshing the feed until Ctrl-C
    Watch {
        #[arg(long)]
        patient: Option<String>,
        #[arg(long)]
        all: bool,
    },
}

pub async fn run(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Patients(cmd) => patients(cmd, config).await,
        Command::Register(args) => register(args, config).await,
        Command::Vitals(cmd) => vitals(cmd, config).await,
        Command::Alerts(cmd) => alerts(cmd, config).await,
        Command::Ask { question, patient } => match question {
            Some(question) => ask(&question, patient, config).await,
            None => {
                render::suggestions();
                Ok(())
            }
        },
        Command::Analytics { patient_id } => {
            let result = AnalyticsService::new(config)
                .get_analytics(&patient_id)
                .await?;
            render::analytics(&result);
            Ok(())
        }
        Command::Dashboard { patient_id } => dashboard(&patient_id, config).await,
    }
}

/// A new column without an explicit order starts ascending; an order
/// alone applies to the current column.
fn apply_sort(registry: &mut PatientRegistry, sort: Option<SortField>, order: Option<SortOrder>) {
    let (current_field, current_order) = registry.sort_key();
    let field = sort.unwrap_or(current_field);
    let order = match order {
        Some(order) => order,
        None if field != current_field => SortOrder::Asc,
        None => current_order,
    };
    registry.set_sort(field, order);
}

async fn patients(cmd: PatientCommand, config: &AppConfig) -> anyhow::Result<()> {
    let service = PatientService::new(config);

    match cmd {
        PatientCommand::List {
            search,
            gender,
            sort,
            order,
            page,
        } => {
            let mut registry = PatientRegistry::new();
            registry.load(&service).await;
            if let Some(message) = registry.error() {
                bail!("{}", message);
            }

            apply_sort(&mut registry, sort, order);
            registry.set_query(search);
            registry.set_gender(gender);
            registry.set_page(page);

            render::registry(&registry);
        }
        PatientCommand::Show { id } => {
            let mut detail = PatientDetail::new(id, DetailServices::new(config));
            detail.load().await;
            if let DetailState::NotFound(message) = detail.state() {
                bail!("{}", message);
            }
            render::patient_detail(&detail);
        }
        PatientCommand::Create(args) => {
            let request = IdentityForm::from(args).parse()?;
            let patient = service.create_patient(&request).await?;
            render::patient(&patient);
        }
        PatientCommand::Update {
            id,
            name,
            age,
            gender,
            contact,
            history,
        } => {
            let update = PatientUpdate {
                name,
                age,
                gender,
                contact,
                medical_history: history,
            };
            if update.is_empty() {
                bail!("Nothing to update; pass at least one field");
            }
            let patient = service.update_patient(&id, &update).await?;
            render::patient(&patient);
        }
        PatientCommand::Delete { id } => {
            service.delete_patient(&id).await?;
            println!("Deleted patient {}", id);
        }
    }

    Ok(())
}

async fn register(args: RegisterArgs, config: &AppConfig) -> anyhow::Result<()> {
    let mut wizard = RegistrationWizard::new();
    wizard.identity = args.identity.into();
    if !wizard.next() {
        bail!("Name, age and gender are required");
    }

    args.reading.fill(&mut wizard.vitals);
    if !wizard.can_submit() {
        bail!("All five vital readings are required");
    }

    let registration = wizard
        .submit(&PatientService::new(config), &VitalsService::new(config))
        .await?;

    render::patient(&registration.patient);
    render::risk_result(&registration.result);
    Ok(())
}

async fn vitals(cmd: VitalsCommand, config: &AppConfig) -> anyhow::Result<()> {
    let service = VitalsService::new(config);

    match cmd {
        VitalsCommand::History { patient_id, limit } => {
            let history = service.history(&patient_id, limit).await?;
            render::vitals_history(&history);
        }
        VitalsCommand::Ranges => render::reference_ranges(),
        VitalsCommand::Submit {
            patient_id,
            reading,
        } => {
            let mut form = VitalsForm::new();
            reading.fill(&mut form);
            let result = form.submit(&service, &patient_id).await?;
            render::risk_result(&result);
        }
    }

    Ok(())
}

fn alert_monitor(config: &AppConfig, patient: Option<String>, all: bool) -> AlertMonitor {
    let scope = match patient {
        Some(patient_id) => FeedScope::Patient { patient_id },
        None => FeedScope::Global {
            limit: DEFAULT_FEED_LIMIT,
        },
    };
    let filter = if all {
        AlertFilter::All
    } else {
        AlertFilter::Unacknowledged
    };

    AlertMonitor::new(
        Arc::new(AlertService::new(config)),
        AlertFeed::new(scope, filter),
    )
}

async fn alerts(cmd: AlertCommand, config: &AppConfig) -> anyhow::Result<()> {
    match cmd {
        AlertCommand::List { patient, all } => {
            let monitor = alert_monitor(config, patient, all);
            monitor.refresh().await;

            let feed = monitor.feed().await;
            if let Some(message) = feed.error() {
                bail!("{}", message);
            }
            render::alert_feed(&feed);
        }
        AlertCommand::Ack { id } => {
            let alert = AlertService::new(config).acknowledge_alert(&id).await?;
            println!("Acknowledged alert {} ({})", alert.id, alert.message);
        }
        AlertCommand::Watch { patient, all } => {
            let monitor = alert_monitor(config, patient, all);
            let mut updates = monitor.subscribe();
            let handle = monitor.start_polling(config.alert_poll_interval);

            let ctrl_c = tokio::signal::ctrl_c();
            tokio::pin!(ctrl_c);

            loop {
                tokio::select! {
                    signal = &mut ctrl_c => {
                        signal.context("failed to listen for Ctrl-C")?;
                        break;
                    }
                    changed = updates.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        render::alert_feed(&*monitor.feed().await);
                    }
                }
            }

            info!("Stopping alert watch");
            handle.stop().await;
        }
    }

    Ok(())
}

async fn ask(question: &str, patient: Option<String>, config: &AppConfig) -> anyhow::Result<()> {
    let service = AssistantService::new(config);
    let mut transcript = match patient {
        Some(patient_id) => ChatTranscript::for_patient(patient_id),
        None => ChatTranscript::new(),
    };

    match transcript.send(&service, question).await {
        Some(reply) => render::chat_reply(reply),
        None => bail!("Question must not be empty"),
    }

    Ok(())
}

async fn dashboard(patient_id: &str, config: &AppConfig) -> anyhow::Result<()> {
    let mut dashboard = PatientDashboard::new(patient_id, config);
    dashboard.load().await?;
    dashboard.load_analytics().await;

    render::dashboard(&dashboard);
    Ok(())
}
