use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use recruit_portal::config::{AppConfig, AssistConfig};
use recruit_portal::error::AppError;
use recruit_portal::recruitment::applications::{
    portal_router, ApplicationService, ApplicationServiceError, ApplicationStatus, Category,
    DocumentKind, DocumentRef, EducationDraft, ExperienceDraft, InMemoryApplicationRepository,
    PersonalDetails, PortalState,
};
use recruit_portal::recruitment::assist::{GeminiGenerator, StatementGenerator};
use recruit_portal::recruitment::postings::{InMemoryPostingCatalog, PostingCatalog};
use recruit_portal::recruitment::registration::{
    InMemoryUserRoster, RegistrationRequest, RegistrationService, User, UserId, UserRole,
};
use recruit_portal::recruitment::report::RecruitmentReport;
use recruit_portal::site::{SiteConfig, SiteConfigStore};
use recruit_portal::telemetry;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Recruitment Portal",
    about = "Run the CSIR-SERC recruitment portal service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk one application through the whole lifecycle on the console
    Demo,
    /// Print dashboard aggregates for a sample applicant pool
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Also write the scrutiny listing as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,
}

struct PortalServices {
    registration: Arc<RegistrationService<InMemoryUserRoster>>,
    applications: Arc<ApplicationService<InMemoryApplicationRepository, InMemoryPostingCatalog>>,
    catalog: Arc<InMemoryPostingCatalog>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Demo => run_demo().await,
        Command::Report(args) => run_report(args),
    }
}

fn portal_services(assist: &AssistConfig) -> PortalServices {
    let catalog = Arc::new(InMemoryPostingCatalog::seeded());
    let generator: Arc<dyn StatementGenerator> = Arc::new(GeminiGenerator::new(assist));

    PortalServices {
        registration: Arc::new(RegistrationService::new(Arc::new(
            InMemoryUserRoster::seeded(),
        ))),
        applications: Arc::new(ApplicationService::new(
            Arc::new(InMemoryApplicationRepository::default()),
            catalog.clone(),
            generator,
        )),
        catalog,
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let services = portal_services(&config.assist);
    let portal = PortalState {
        applications: services.applications.clone(),
        registration: services.registration.clone(),
        catalog: services.catalog.clone(),
    };
    let site_store = Arc::new(SiteConfigStore::new(config.site.path.clone()));

    let ops = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state);

    let app = portal_router(portal)
        .merge(site_router(site_store))
        .merge(ops)
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "recruitment portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn site_router(store: Arc<SiteConfigStore>) -> Router {
    Router::new()
        .route(
            "/api/v1/site-config",
            get(site_config_endpoint).put(update_site_config_endpoint),
        )
        .route(
            "/api/v1/site-config/reset",
            post(reset_site_config_endpoint),
        )
        .with_state(store)
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn site_config_endpoint(State(store): State<Arc<SiteConfigStore>>) -> Json<SiteConfig> {
    Json(store.load())
}

async fn update_site_config_endpoint(
    State(store): State<Arc<SiteConfigStore>>,
    Json(config): Json<SiteConfig>,
) -> Result<Json<SiteConfig>, AppError> {
    store.save(&config)?;
    Ok(Json(config))
}

async fn reset_site_config_endpoint(
    State(store): State<Arc<SiteConfigStore>>,
) -> Result<Json<SiteConfig>, AppError> {
    Ok(Json(store.reset()?))
}

fn demo_reviewer() -> User {
    User {
        id: UserId("demo-reviewer".to_string()),
        name: "Scrutiny Officer".to_string(),
        email: "scrutiny@serc.res.in".to_string(),
        mobile: "9000000001".to_string(),
        aadhaar: "222233334444".to_string(),
        role: UserRole::Admin,
    }
}

async fn run_demo() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let services = portal_services(&config.assist);

    println!("Recruitment portal walkthrough");

    println!("\nAdvertised posts");
    for post in services.catalog.list_open() {
        println!(
            "- {} {} ({} vacancies, closes {})",
            post.code, post.title, post.vacancies, post.last_date
        );
    }

    let applicant = services.registration.register(RegistrationRequest {
        name: "Asha Raman".to_string(),
        email: "asha.raman@example.com".to_string(),
        mobile: "9876543211".to_string(),
        aadhaar: "555566667777".to_string(),
    })?;
    println!("\nRegistered {} as {}", applicant.name, applicant.id.0);

    let draft = services
        .applications
        .start_draft(&applicant, &services.catalog.list_open()[0].id)?;
    let id = draft.id.clone();
    println!("Opened draft {}", id.0);

    let personal = PersonalDetails {
        full_name: "Asha Raman".to_string(),
        father_name: "K. Raman".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1996, 4, 12),
        gender: "Female".to_string(),
        category: Category::Sc,
        mobile: "98765 43211".to_string(),
        aadhaar: "5555-6666-7777".to_string(),
        address: "12 Gandhi Street, Taramani, Chennai".to_string(),
        nationality: "Indian".to_string(),
    };
    let violations = services
        .applications
        .update_personal(&id, &applicant, personal)?;
    println!(
        "Saved personal details ({} outstanding issue(s))",
        violations.len()
    );

    services.applications.add_education(
        &id,
        &applicant,
        EducationDraft {
            level: "B.E. Civil Engineering".to_string(),
            board: "Anna University".to_string(),
            institution: "College of Engineering, Guindy".to_string(),
            year: "2018".to_string(),
            percentage: "84%".to_string(),
        },
    )?;
    services.applications.add_experience(
        &id,
        &applicant,
        ExperienceDraft {
            organization: "L&T Construction".to_string(),
            designation: "Site Engineer".to_string(),
            from_date: NaiveDate::from_ymd_opt(2018, 7, 1),
            to_date: None,
            responsibilities: "Supervised bridge deck casting and QA records.".to_string(),
        },
    )?;
    services.applications.set_publications(
        &id,
        &applicant,
        vec![
            "Raman, A. (2021). Fatigue behaviour of steel box girders. Journal of Structural Engineering."
                .to_string(),
        ],
    )?;
    for (kind, file_name) in [
        (DocumentKind::Photo, "photo.jpg"),
        (DocumentKind::Signature, "signature.png"),
        (DocumentKind::Resume, "resume.pdf"),
    ] {
        services.applications.attach_document(
            &id,
            &applicant,
            kind,
            DocumentRef {
                file_name: file_name.to_string(),
                storage_key: format!("uploads/{file_name}"),
            },
        )?;
    }

    let statement_draft = services
        .applications
        .draft_statement(&id, &applicant)
        .await?;
    println!(
        "\nAssisted statement ({}): {}",
        statement_draft.source.label(),
        statement_draft.text
    );
    if statement_draft.is_generated() {
        services
            .applications
            .accept_statement(&id, &applicant, &statement_draft)?;
        println!("Accepted the assisted draft into the form");
    } else {
        services.applications.set_statement(
            &id,
            &applicant,
            "I wish to contribute my structural engineering experience to national research."
                .to_string(),
        )?;
        println!("Kept a manually written statement instead");
    }

    match services.applications.submit(&id, &applicant) {
        Ok(_) => {}
        Err(ApplicationServiceError::SubmissionRejected { violations }) => {
            println!("\nSubmission rejected:");
            for violation in &violations {
                println!("- {violation}");
            }
        }
        Err(error) => return Err(error.into()),
    }

    services.applications.attach_document(
        &id,
        &applicant,
        DocumentKind::CasteCertificate,
        DocumentRef {
            file_name: "caste-certificate.pdf".to_string(),
            storage_key: "uploads/caste-certificate.pdf".to_string(),
        },
    )?;
    let submitted = services.applications.submit(&id, &applicant)?;
    println!(
        "\nApplication {} submitted with status {}",
        submitted.id.0,
        submitted.status.label()
    );

    let reviewer = demo_reviewer();
    println!("\nReview trail");
    for status in [
        ApplicationStatus::UnderScrutiny,
        ApplicationStatus::Eligible,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Selected,
    ] {
        let record = services.applications.review(&id, &reviewer, status)?;
        println!("- moved to {}", record.status.label());
    }
    if let Err(error) = services
        .applications
        .review(&id, &reviewer, ApplicationStatus::Rejected)
    {
        println!("Further review refused: {error}");
    }

    let report = services.applications.report()?;
    render_report(&report, false);

    Ok(())
}

fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let services = portal_services(&config.assist);
    seed_sample_pool(&services)?;

    let report = services.applications.report()?;
    println!("Recruitment dashboard (sample pool)");
    render_report(&report, true);

    if let Some(path) = args.csv {
        let file = std::fs::File::create(&path)?;
        report.write_csv(file)?;
        println!("\nCSV export written to {}", path.display());
    }

    Ok(())
}

/// Files one complete application per pool entry and walks each through its
/// review chain.
fn seed_sample_pool(services: &PortalServices) -> Result<(), AppError> {
    let pool: [(&str, &str, &str, usize, Category, &[ApplicationStatus]); 5] = [
        (
            "Asha Raman",
            "9876500001",
            "555500000001",
            0,
            Category::Sc,
            &[ApplicationStatus::UnderScrutiny],
        ),
        (
            "Vikram Joshi",
            "9876500002",
            "555500000002",
            0,
            Category::Gen,
            &[
                ApplicationStatus::UnderScrutiny,
                ApplicationStatus::Eligible,
            ],
        ),
        (
            "Meena Pillai",
            "9876500003",
            "555500000003",
            1,
            Category::Obc,
            &[],
        ),
        (
            "Ravi Shankar",
            "9876500004",
            "555500000004",
            2,
            Category::Ews,
            &[
                ApplicationStatus::UnderScrutiny,
                ApplicationStatus::Eligible,
                ApplicationStatus::InterviewScheduled,
            ],
        ),
        (
            "Divya Nair",
            "9876500005",
            "555500000005",
            2,
            Category::Pwd,
            &[
                ApplicationStatus::UnderScrutiny,
                ApplicationStatus::NotEligible,
            ],
        ),
    ];

    let posts = services.catalog.list_open();
    let reviewer = demo_reviewer();

    for (name, mobile, aadhaar, post_index, category, chain) in pool {
        let applicant = services.registration.register(RegistrationRequest {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            mobile: mobile.to_string(),
            aadhaar: aadhaar.to_string(),
        })?;

        let draft = services
            .applications
            .start_draft(&applicant, &posts[post_index].id)?;
        let id = draft.id.clone();

        services.applications.update_personal(
            &id,
            &applicant,
            PersonalDetails {
                full_name: name.to_string(),
                father_name: "On record".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1995, 1, 15),
                gender: "On record".to_string(),
                category,
                mobile: mobile.to_string(),
                aadhaar: aadhaar.to_string(),
                address: "On record, Chennai".to_string(),
                nationality: "Indian".to_string(),
            },
        )?;
        services.applications.add_education(
            &id,
            &applicant,
            EducationDraft {
                level: "B.E.".to_string(),
                board: "Anna University".to_string(),
                institution: "College of Engineering, Guindy".to_string(),
                year: "2017".to_string(),
                percentage: "80%".to_string(),
            },
        )?;
        services.applications.add_experience(
            &id,
            &applicant,
            ExperienceDraft {
                organization: "CSIR-SERC".to_string(),
                designation: "Project Assistant".to_string(),
                from_date: NaiveDate::from_ymd_opt(2019, 1, 1),
                to_date: None,
                responsibilities: "Laboratory testing support.".to_string(),
            },
        )?;

        let mut documents = vec![
            (DocumentKind::Photo, "photo.jpg"),
            (DocumentKind::Signature, "signature.png"),
            (DocumentKind::Resume, "resume.pdf"),
        ];
        if category.requires_caste_certificate() {
            documents.push((DocumentKind::CasteCertificate, "caste-certificate.pdf"));
        }
        for (kind, file_name) in documents {
            services.applications.attach_document(
                &id,
                &applicant,
                kind,
                DocumentRef {
                    file_name: file_name.to_string(),
                    storage_key: format!("uploads/{}/{file_name}", applicant.id.0),
                },
            )?;
        }

        services.applications.submit(&id, &applicant)?;
        for status in chain {
            services.applications.review(&id, &reviewer, *status)?;
        }
    }

    Ok(())
}

fn render_report(report: &RecruitmentReport, list_rows: bool) {
    println!("\nDashboard");
    println!(
        "- applications received: {}",
        report.stats.total_applications
    );
    println!("- pending scrutiny: {}", report.stats.pending_scrutiny);
    println!("- eligible: {}", report.stats.eligible);
    println!("- interviews scheduled: {}", report.stats.interviews);

    println!("\nApplications by post type");
    for entry in &report.post_type_load {
        println!(
            "- {}: {} application(s) for {} advertised vacancies",
            entry.post_type_label, entry.applications, entry.vacancies
        );
    }

    println!("\nCategory share");
    for entry in &report.category_share {
        println!("- {}: {}", entry.category_label, entry.applications);
    }

    if list_rows {
        println!("\nScrutiny listing");
        for row in &report.applications {
            println!(
                "- {} | {} | {} | {} | {}",
                row.application_id, row.post_code, row.post_title, row.category, row.status
            );
        }
    }
}
