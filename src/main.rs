use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::process;

use chrono::Local;
use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use yansi::Paint;

use carhop::api::ApiClient;
use carhop::config::{self, DEFAULT_HOST, DEFAULT_PORT};
use carhop::controllers::carousel::{self, CarouselState, CARD_SCROLL_AMOUNT};
use carhop::controllers::{
    CancelOutcome, CarouselPolicy, CatalogController, ReservationForm, ReservationPhase, SubmitOutcome,
    SuggestionController,
};
use carhop::models::{AppState, Car, Field, FilterState};
use carhop::storage::{self, FileStore};
use carhop::{ClientError, Result};

#[derive(Parser)]
#[command(
    name = "carhop",
    author,
    version,
    about = "Browse rental cars and book one",
    long_about = r#"Carhop: browse the rental fleet and reserve a car, from the browser or the terminal.

The backend API location is read from API_BASE_URL (or a .env file passed with --env-file).
The terminal commands keep the selected car and the reservation draft in a local
storage file (CARHOP_STORAGE, default .carhop/storage.json) so a reservation can be
filled in over several invocations.

Examples:
  1) Run the web front-end:
      carhop serve --port 8080
  2) Find a car and reserve it:
      carhop cars --type SUV
      carhop select 1HGCM82633A004352
      carhop reserve set name "Jane Doe"
      carhop reserve submit
"#,
    after_help = "Use `carhop <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web front-end
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Check that the backend API is reachable
    CheckConfig,
    /// List the car types and brands used for filtering
    Filters,
    /// List cars, optionally filtered
    Cars {
        /// Free-text search over type, brand, model and description
        #[arg(long, short = 's', default_value = "")]
        search: String,
        /// Exact car type
        #[arg(long = "type", short = 't', default_value = "")]
        car_type: String,
        /// Exact brand
        #[arg(long, short = 'b', default_value = "")]
        brand: String,
    },
    /// Show the featured carousel
    Featured {
        /// Animate the carousel with autoplay
        #[arg(long)]
        play: bool,
        /// Number of autoplay steps when playing
        #[arg(long, default_value_t = 5)]
        ticks: usize,
        /// Show every available car instead of the configured policy
        #[arg(long)]
        all: bool,
    },
    /// Search suggestions for a text; --pick applies one and lists the matching cars
    Suggest {
        text: String,
        /// 1-based index of the suggestion to apply
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Pick the car to reserve
    Select { vin: String },
    /// Fill in, inspect and submit the reservation for the selected car
    Reserve {
        #[command(subcommand)]
        sub: ReserveCommands,
    },
}

#[derive(Subcommand)]
enum ReserveCommands {
    /// Show the selected car and the draft with its validation state
    Show,
    /// Set one field (name, phone, email, license, start-date, rental-period)
    Set { field: String, value: String },
    /// Send the reservation
    Submit,
    /// Leave the reservation; the draft is kept
    Cancel {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }
    table
}

fn print_cars(cars: &[Car]) {
    if cars.is_empty() {
        println!("{}", "No cars match your search.".dim());
        return;
    }
    let mut table = new_table();
    table.set_header(vec!["VIN", "Car", "Type", "Price", "Status"]);
    for car in cars {
        table.add_row(vec![
            car.vin.clone(),
            car.title_with_year(),
            car.car_type.clone(),
            car.price_display(),
            car.availability_display().to_string(),
        ]);
    }
    println!("\n{table}\n");
}

fn print_form(form: &ReservationForm) {
    match form.phase() {
        ReservationPhase::NoCarSelected => {
            println!("{}", "No car selected. Use `carhop select <VIN>` first.".yellow());
            return;
        }
        ReservationPhase::Submitted => {
            println!("{}", "Reservation already submitted.".green());
            return;
        }
        ReservationPhase::CarUnavailable(car) => {
            println!("{} {}", car.title_with_year().bold(), "This car is no longer available".red());
            return;
        }
        ReservationPhase::FormActive(car) => {
            println!("\n{} {}", car.title_with_year().bold(), car.price_display().cyan());
        }
    }
    let mut table = new_table();
    table.set_header(vec!["Field", "Value", "Status"]);
    for field in Field::ALL {
        let status = match form.error(field) {
            Some(message) => message.red().to_string(),
            None if form.draft().value(field).is_empty() => String::new(),
            None => "ok".green().to_string(),
        };
        table.add_row(vec![field.label().to_string(), form.draft().value(field).to_string(), status]);
    }
    println!("{table}");
    println!("Total price: {}", form.total_display().bold());
    if form.is_submittable() {
        println!("{}\n", "Ready to submit: carhop reserve submit".green());
    } else {
        println!("{}\n", "Complete every field to submit.".dim());
    }
}

fn open_store() -> Result<FileStore> {
    FileStore::open(config::get_storage_path())
}

async fn active_form(api: &ApiClient, store: &FileStore) -> ReservationForm {
    let form = ReservationForm::enter(api, store, Local::now().date_naive()).await;
    if !form.is_active() {
        print_form(&form);
        process::exit(1);
    }
    form
}

fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush().ok();
    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_lowercase().as_str(), "y" | "yes")
}

async fn start_server(state: AppState, host: &str, port: u16) {
    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", "Invalid host/port format".red(), e);
            process::exit(1);
        }
    };
    let app = carhop::routes::build_router(state);
    tracing::info!(%addr, "Starting Carhop web front-end");
    println!("{} {}", "Web server running on".green(), format!("http://{}", addr).cyan());
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", "Server error".red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                format!("Failed to bind to {}", addr).red(),
                e,
                "Please stop any process using this port, or start the server with a different --port value.".yellow()
            );
            process::exit(1);
        }
    }
}

async fn run(command: Commands, api: ApiClient) -> Result<()> {
    match command {
        Commands::Serve { host, port } => {
            let state = AppState::new(api, config::get_carousel_policy());
            start_server(state, &host, port).await;
        }
        Commands::CheckConfig => {
            println!("API base URL: {}", api.base_url().cyan());
            let vocabulary = carhop::api::load_filters(&api).await?;
            println!(
                "{}",
                format!(
                    "Backend reachable ({} car types, {} brands)",
                    vocabulary.car_types.len(),
                    vocabulary.brands.len()
                )
                .green()
            );
            println!("Local storage: {}", config::get_storage_path().display());
        }
        Commands::Filters => {
            let vocabulary = carhop::api::load_filters(&api).await?;
            let mut table = new_table();
            table.set_header(vec!["Car types", "Brands"]);
            let rows = vocabulary.car_types.len().max(vocabulary.brands.len());
            for i in 0..rows {
                table.add_row(vec![
                    vocabulary.car_types.get(i).cloned().unwrap_or_default(),
                    vocabulary.brands.get(i).cloned().unwrap_or_default(),
                ]);
            }
            println!("\n{table}\n");
        }
        Commands::Cars { search, car_type, brand } => {
            let filters = FilterState::new(search, car_type, brand);
            let cars = carhop::api::load_cars(&api, &filters).await?;
            print_cars(&cars);
        }
        Commands::Featured { play, ticks, all } => {
            let policy = if all { CarouselPolicy::AllAvailable } else { config::get_carousel_policy() };
            let mut catalog = CatalogController::new(api, policy);
            if !catalog.load_cars(&FilterState::default()).await {
                return Err(ClientError::Network("could not load the car list".into()));
            }
            let featured = catalog.state().featured().to_vec();
            if !play {
                print_cars(&featured);
                return Ok(());
            }
            if featured.is_empty() {
                println!("{}", "No available cars to feature.".dim());
                return Ok(());
            }
            let mut state = CarouselState::new(featured, CARD_SCROLL_AMOUNT * 3.0);
            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::with_template("{msg:30} [{bar:40.cyan/blue}] {pos:>3}%")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            );
            carousel::play(&mut state, ticks, |s| {
                bar.set_position(s.progress().round() as u64);
                if let Some(car) = s.cards().get(s.current_index()) {
                    bar.set_message(format!("{} {}", car.display_name(), car.price_display()));
                }
            })
            .await;
            bar.finish();
        }
        Commands::Suggest { text, pick } => {
            let mut suggestions = SuggestionController::new(api.clone(), config::get_debounce_delay());
            let list = suggestions.lookup(&text).await.to_vec();
            if list.is_empty() {
                println!("{}", "No suggestions.".dim());
                return Ok(());
            }
            let Some(pick) = pick else {
                for (i, s) in list.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, s);
                }
                return Ok(());
            };
            let Some(choice) = pick.checked_sub(1).and_then(|i| list.get(i)) else {
                return Err(ClientError::InvalidForm(format!("no suggestion number {}", pick)));
            };
            let mut catalog = CatalogController::new(api, config::get_carousel_policy());
            catalog.load_filters().await;
            let filters = suggestions
                .state_mut()
                .select(choice, catalog.state().vocabulary(), &FilterState::default());
            println!(
                "Search {} type {} brand {}",
                filters.search.as_str().cyan(),
                filters.car_type.as_str().cyan(),
                filters.brand.as_str().cyan()
            );
            catalog.load_cars(&filters).await;
            print_cars(catalog.state().cars());
        }
        Commands::Select { vin } => {
            let car = carhop::api::get_car(&api, &vin).await?;
            let mut store = open_store()?;
            storage::select_car(&mut store, &car.vin)?;
            println!("{} {}", "Selected".green(), car.title_with_year().bold());
            if !car.available {
                println!("{}", "This car is no longer available".red());
            }
        }
        Commands::Reserve { sub } => {
            let mut store = open_store()?;
            match sub {
                ReserveCommands::Show => {
                    let form = ReservationForm::enter(&api, &store, Local::now().date_naive()).await;
                    print_form(&form);
                }
                ReserveCommands::Set { field, value } => {
                    let Some(field) = Field::from_key(&field) else {
                        return Err(ClientError::InvalidForm(format!("unknown field '{}'", field)));
                    };
                    let mut form = active_form(&api, &store).await;
                    form.on_input(field, &value, &mut store, Local::now().date_naive())?;
                    print_form(&form);
                }
                ReserveCommands::Submit => {
                    let mut form = active_form(&api, &store).await;
                    if !form.is_submittable() {
                        print_form(&form);
                        process::exit(1);
                    }
                    match form.submit(&api, &mut store).await? {
                        SubmitOutcome::Accepted(receipt) => {
                            println!("{}", "Reservation successful!".green().bold());
                            if let Some(order) = receipt.order {
                                println!(
                                    "{} from {} for {} days, total {}",
                                    order.car.vin,
                                    order.rental.start_date,
                                    order.rental.rental_period,
                                    carhop::utils::format_price(order.rental.total_price)
                                );
                            }
                        }
                        SubmitOutcome::Rejected(message) => {
                            eprintln!("{}", message.red());
                            process::exit(1);
                        }
                    }
                }
                ReserveCommands::Cancel { yes } => {
                    let form = ReservationForm::default();
                    let confirmed = yes || confirm("Are you sure you want to cancel? Your form data will be saved.");
                    match form.cancel(confirmed) {
                        CancelOutcome::ReturnToCatalog => println!("{}", "Reservation cancelled; your draft is kept.".yellow()),
                        CancelOutcome::Stay => println!("Still on the reservation."),
                    }
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::disable();
    }

    config::load_env_file(cli.env_file.as_deref());

    let api = match ApiClient::new(&config::get_api_base_url()) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("{}: {}", "Failed to create HTTP client".red(), e);
            process::exit(1);
        }
    };

    // No subcommand: serve the web front-end on the defaults
    let command = cli.command.unwrap_or(Commands::Serve {
        host: DEFAULT_HOST.to_string(),
        port: DEFAULT_PORT,
    });

    if let Err(e) = run(command, api).await {
        match e {
            ClientError::Network(_) => {
                eprintln!(
                    "{}: {}\n{}",
                    "Could not reach the backend".red(),
                    e,
                    "Check API_BASE_URL or run `carhop check-config`.".yellow()
                );
            }
            _ => eprintln!("{}", e.to_string().red()),
        }
        process::exit(1);
    }
}
