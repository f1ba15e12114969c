use clap::{Args, Parser, Subcommand};
use colored::*;
use env_logger::Env;
use jiff::Timestamp;

use crate::{
    config::{Config, DEFAULT_LOG_FILTER, LOG_VAR},
    dashboard::{
        camera::CameraCommand,
        map::{AddedPoint, MapPoint},
        routes::{PageCategory, Route},
        session::DashboardSession,
    },
    models::{
        location::LocationFields,
        location_log::{LocationLogFields, parse_timestamp},
        store::Store,
    },
    services::{
        location_logs::{
            AddLocationLogError, AddLocationLogParameters, DeleteLocationLogError,
            LocationLogChanges, UpdateLocationLogError, UpdateLocationLogParameters,
            add_location_log, delete_location_log, find_location_log, update_location_log,
        },
        locations::{
            CreateLocationError, CreateLocationParameters, FindLocationParameters,
            LocationChanges, RemoveLocationError, RemoveLocationParameters, UpdateLocationError,
            UpdateLocationParameters, create_location, find_location, list_locations,
            remove_location, update_location,
        },
    },
    storage::{Storage, json::JsonFileStorage},
};

mod config;
mod dashboard;
mod models;
mod services;
mod slugs;
mod storage;
mod ui;

#[derive(Parser)]
#[command(
    name = "locus",
    about = "Keep track of the places you go and what happened there"
)]
struct Cli {
    /// Act as this user (defaults to $LOCUS_USER, then 1)
    #[arg(short, long, global = true)]
    user: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage locations
    #[command(subcommand)]
    Location(LocationCommands),

    /// Manage location logs
    #[command(subcommand)]
    Log(LogCommands),

    /// Show the sidebar, map points and camera moves of a dashboard page
    Dashboard {
        /// Page name (e.g. "dashboard", "dashboard-location-slug")
        #[arg(default_value = "dashboard")]
        route: String,

        /// Location slug parameter
        #[arg(short, long)]
        slug: Option<String>,

        /// Location log id parameter
        #[arg(short, long)]
        id: Option<u64>,

        /// Select the map point with this id after loading
        #[arg(long)]
        select: Option<u64>,

        /// Select without moving the camera
        #[arg(long, requires = "select")]
        quiet: bool,

        /// Drop a new, unsaved point on the map
        #[arg(long, num_args = 2, value_names = ["LAT", "LONG"], allow_hyphen_values = true)]
        add_at: Option<Vec<f64>>,

        /// Reload the location list once more before printing
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(Args)]
struct CoordinateArgs {
    /// Latitude in degrees (-90 to 90)
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in degrees (-180 to 180)
    #[arg(long, allow_hyphen_values = true)]
    long: f64,
}

#[derive(Args)]
struct EditArgs {
    /// New name
    #[arg(short, long)]
    name: Option<String>,

    /// New description (empty to clear)
    #[arg(short, long)]
    description: Option<String>,

    /// New latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// New longitude
    #[arg(long, allow_hyphen_values = true)]
    long: Option<f64>,
}

#[derive(Subcommand)]
enum LocationCommands {
    /// Create a new location
    Add {
        name: String,

        #[command(flatten)]
        coordinates: CoordinateArgs,

        /// Add a description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List your locations
    List,
    /// Show a location and its logs
    View { slug: String },
    /// Edit a location (the slug stays the same)
    Edit {
        slug: String,

        #[command(flatten)]
        changes: EditArgs,
    },
    /// Delete a location and all of its logs
    Delete { slug: String },
}

#[derive(Subcommand)]
enum LogCommands {
    /// Record a visit to a location
    Add {
        /// Slug of the location
        slug: String,

        name: String,

        #[command(flatten)]
        coordinates: CoordinateArgs,

        #[arg(short, long)]
        description: Option<String>,

        /// When it started (e.g. "2025-06-01 18:30"); defaults to now
        #[arg(long)]
        started_at: Option<String>,

        /// When it ended
        #[arg(long)]
        ended_at: Option<String>,
    },
    /// Show a log
    View { id: u64 },
    /// Edit a log
    Edit {
        id: u64,

        #[command(flatten)]
        changes: EditArgs,

        #[arg(long)]
        started_at: Option<String>,

        /// New end time (empty to clear)
        #[arg(long)]
        ended_at: Option<String>,
    },
    /// Delete a log
    Delete { id: u64 },
}

fn main() {
    env_logger::init_from_env(Env::default().filter_or(LOG_VAR, DEFAULT_LOG_FILTER));

    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let user_id = cli.user.unwrap_or(config.user_id);

    if let Some(parent) = config.store_path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|e| {
            eprintln!("Error: Failed to create data directory: {}", e);
            std::process::exit(1);
        });
    }

    let storage = JsonFileStorage::new(config.store_path);

    let mut store = match storage.load() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: Failed to load store: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Location(command)) => {
            run_location_command(command, &mut store, &storage, user_id)
        }
        Some(Commands::Log(command)) => run_log_command(command, &mut store, &storage, user_id),
        Some(Commands::Dashboard {
            route,
            slug,
            id,
            select,
            quiet,
            add_at,
            refresh,
        }) => {
            let options = DashboardOptions {
                route: Route { name: route, slug, id },
                select,
                quiet,
                add_at: add_at.and_then(|v| Some((*v.first()?, *v.get(1)?))),
                refresh,
            };
            run_dashboard(&store, user_id, options);
        }
        None => run_dashboard(
            &store,
            user_id,
            DashboardOptions {
                route: Route::dashboard(),
                ..DashboardOptions::default()
            },
        ),
    }
}

fn run_location_command(
    command: LocationCommands,
    store: &mut Store,
    storage: &impl Storage,
    user_id: u64,
) {
    match command {
        LocationCommands::Add {
            name,
            coordinates,
            description,
        } => {
            let params = CreateLocationParameters {
                user_id,
                fields: LocationFields {
                    name,
                    description,
                    lat: coordinates.lat,
                    long: coordinates.long,
                },
            };
            match create_location(store, storage, params) {
                Ok(location) => {
                    println!(
                        "✓ Location {} created with slug {}",
                        location.name, location.slug
                    );
                }
                Err(CreateLocationError::LocationAlreadyExists(name)) => {
                    eprintln!("Error: You already have a location named '{}'", name);
                    eprintln!("\nPick another name or edit the existing one.");
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        LocationCommands::List => {
            let locations = list_locations(store, user_id);
            if locations.is_empty() {
                println!("No locations yet");
            } else {
                ui::render_view_header("LOCATIONS", locations.len(), "location");
                for location in &locations {
                    ui::render_location_line(location);
                }
            }
        }
        LocationCommands::View { slug } => {
            match find_location(store, FindLocationParameters { user_id, slug }) {
                Ok(found) => ui::render_location_details(&found.location, &found.logs),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    suggest_locations(store, user_id);
                    std::process::exit(1);
                }
            }
        }
        LocationCommands::Edit { slug, changes } => {
            let params = UpdateLocationParameters {
                user_id,
                slug,
                changes: LocationChanges {
                    name: changes.name,
                    description: changes.description,
                    lat: changes.lat,
                    long: changes.long,
                },
            };
            match update_location(store, storage, params) {
                Ok(location) => println!("✓ Location updated: {}", location.name),
                Err(UpdateLocationError::LocationNotFound(slug)) => {
                    eprintln!("Error: Location '{}' not found", slug);
                    suggest_locations(store, user_id);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        LocationCommands::Delete { slug } => {
            let params = RemoveLocationParameters { user_id, slug };
            match remove_location(store, storage, params) {
                Ok(result) => {
                    println!("✓ Location deleted: {}", result.location.name);
                    if result.cascaded_logs_count > 0 {
                        println!("  └─ {} log(s) also deleted", result.cascaded_logs_count);
                    }
                }
                Err(RemoveLocationError::LocationNotFound(slug)) => {
                    eprintln!("Error: Location '{}' not found", slug);
                    suggest_locations(store, user_id);
                    std::process::exit(1);
                }
                Err(RemoveLocationError::Storage(e)) => {
                    eprintln!("Error: Failed to delete location: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn run_log_command(command: LogCommands, store: &mut Store, storage: &impl Storage, user_id: u64) {
    match command {
        LogCommands::Add {
            slug,
            name,
            coordinates,
            description,
            started_at,
            ended_at,
        } => {
            let fields = LocationLogFields {
                name,
                description,
                lat: coordinates.lat,
                long: coordinates.long,
                started_at: started_at
                    .as_deref()
                    .map(parse_timestamp_arg)
                    .unwrap_or_else(Timestamp::now),
                ended_at: ended_at.as_deref().map(parse_timestamp_arg),
            };
            let params = AddLocationLogParameters {
                user_id,
                location_slug: slug,
                fields,
            };
            match add_location_log(store, storage, params) {
                Ok(log) => println!("✓ Log #{} added: {}", log.id, log.name),
                Err(AddLocationLogError::LocationNotFound(slug)) => {
                    eprintln!("Error: Location '{}' not found", slug);
                    suggest_locations(store, user_id);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        LogCommands::View { id } => match find_location_log(store, id, user_id) {
            Ok(log) => ui::render_location_log_details(&log),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        LogCommands::Edit {
            id,
            changes,
            started_at,
            ended_at,
        } => {
            let params = UpdateLocationLogParameters {
                user_id,
                id,
                changes: LocationLogChanges {
                    name: changes.name,
                    description: changes.description,
                    lat: changes.lat,
                    long: changes.long,
                    started_at: started_at.as_deref().map(parse_timestamp_arg),
                    ended_at: ended_at.as_deref().map(|input| {
                        Some(input)
                            .filter(|input| !input.is_empty())
                            .map(parse_timestamp_arg)
                    }),
                },
            };
            match update_location_log(store, storage, params) {
                Ok(log) => println!("✓ Log #{} updated: {}", log.id, log.name),
                Err(UpdateLocationLogError::InvalidFields(e)) => {
                    eprintln!("Error: Invalid location log");
                    for issue in e.issues {
                        eprintln!("  - {}", issue);
                    }
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        LogCommands::Delete { id } => match delete_location_log(store, storage, id, user_id) {
            Ok(log) => println!("✓ Log deleted: {}", log.name),
            Err(DeleteLocationLogError::LocationLogNotFound(id)) => {
                eprintln!("Error: Location log #{} not found", id);
                std::process::exit(1);
            }
            Err(DeleteLocationLogError::Storage(e)) => {
                eprintln!("Error: Failed to delete log: {}", e);
                std::process::exit(1);
            }
        },
    }
}

#[derive(Default)]
struct DashboardOptions {
    route: Route,
    select: Option<u64>,
    quiet: bool,
    add_at: Option<(f64, f64)>,
    refresh: bool,
}

fn run_dashboard(store: &Store, user_id: u64, options: DashboardOptions) {
    let DashboardOptions {
        route,
        select,
        quiet,
        add_at,
        refresh,
    } = options;

    let mut session = DashboardSession::<Vec<CameraCommand>>::new(user_id);
    session.init_camera(vec![]);
    session.navigate(route.clone());
    session.load(store);

    if refresh {
        session.refresh_locations();
        session.load(store);
    }

    if let Some((lat, long)) = add_at {
        session.set_added_point(Some(AddedPoint {
            point: MapPoint {
                id: 0,
                label: String::from("New point"),
                lat,
                long,
            },
            center_map: true,
            zoom: None,
        }));
    }

    if let Some(point_id) = select {
        let point = session
            .map()
            .map_points()
            .iter()
            .find(|p| p.id == point_id)
            .cloned();
        match point {
            Some(point) if quiet => session.select_point_without_fly_to(Some(point)),
            Some(point) => session.select_point(Some(point)),
            None => {
                eprintln!("Error: No map point with id {} on this page", point_id);
                std::process::exit(1);
            }
        }
    }

    println!("\n  {} {}", route.path().cyan().bold(), {
        let mut flags = vec![];
        if route.is_edit_page() {
            flags.push("editing");
        }
        if route.category() == PageCategory::Other {
            flags.push("not a dashboard page");
        }
        flags.join(", ").dimmed()
    });

    for (what, error) in [
        ("locations", session.locations().error()),
        ("location", session.current_location().error()),
        ("log", session.current_location_log().error()),
    ] {
        if let Some(error) = error {
            eprintln!("{} could not load {}: {}", "!".red(), what, error);
        }
    }

    let sidebar = session.sidebar();
    ui::render_section_header(&format!("Sidebar ({})", sidebar.items.len()));
    if sidebar.items.is_empty() {
        println!("  {}", "(empty)".dimmed());
    }
    for item in &sidebar.items {
        ui::render_sidebar_item(item);
    }

    let map = session.map();
    ui::render_section_header(&format!("Map ({})", map.map_points().len()));
    for point in map.map_points() {
        ui::render_map_point(point, map.selected_point() == Some(point));
    }
    if let Some(added) = map.added_point() {
        ui::render_map_point(&added.point, false);
    }
    if let Some(bounds) = map.bounds() {
        ui::render_bounds(&bounds);
    }

    ui::render_section_header("Camera");
    for command in map.camera().into_iter().flatten() {
        ui::render_camera_command(command);
    }
    println!();
}

fn parse_timestamp_arg(input: &str) -> Timestamp {
    parse_timestamp(input).unwrap_or_else(|e| {
        eprintln!("Error: Invalid date '{}': {}", input, e);
        eprintln!("\nExpected format: 2025-06-01, 2025-06-01 18:30 or 2025-06-01T18:30:00Z");
        std::process::exit(1);
    })
}

fn suggest_locations(store: &Store, user_id: u64) {
    let locations: Vec<_> = store.locations_for_user(user_id).collect();
    if !locations.is_empty() {
        eprintln!("\nAvailable locations:");
        for location in locations {
            eprintln!("  - {} ({})", location.name, location.slug);
        }
    }
}
