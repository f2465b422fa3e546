//! Chauffeur CLI
//!
//! Command-line interface for pricing trips and booking vehicles.

#![allow(clippy::print_stdout)]

mod wiring;

use std::path::PathBuf;

use anyhow::Context;
use application::{ConfirmationOutcome, SideEffectStatus};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use domain::{
    Booking, BookingId, CustomerInfo, TransferType, TripDetails, TripQuote, Vehicle, VehicleFare,
    VehicleId, polyline,
};
use futures::future::AbortHandle;
use infrastructure::{AppConfig, init_telemetry};
use tracing::info;

use crate::wiring::{Services, Storage};

/// Chauffeur CLI
#[derive(Parser)]
#[command(name = "chauffeur-cli")]
#[command(author, version, about = "Chauffeur trip pricing and booking CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "CHAUFFEUR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Trip details shared by `quote` and `book`
#[derive(Args, Debug, Clone)]
struct TripArgs {
    /// Pickup address or "lat,lon"
    #[arg(long)]
    pickup: String,

    /// Dropoff address or "lat,lon"
    #[arg(long)]
    dropoff: String,

    /// Pickup date (YYYY-MM-DD, default today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Pickup time
    #[arg(long, default_value = "09:00")]
    time: String,

    /// Booked hours
    #[arg(long, default_value_t = 1.0)]
    hours: f64,

    /// Passenger count
    #[arg(long, default_value_t = 1)]
    passengers: u32,

    /// one-way or two-way
    #[arg(long, default_value = "one-way")]
    transfer_type: TransferType,
}

impl TripArgs {
    fn into_trip(self, today: NaiveDate) -> TripDetails {
        TripDetails::new(self.pickup, self.dropoff, self.date.unwrap_or(today), self.time)
            .with_hours(self.hours)
            .with_passengers(self.passengers)
            .with_transfer_type(self.transfer_type)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Price a trip for every vehicle in the catalog
    ///
    /// Example: chauffeur-cli quote --pickup "24.86,67.00" --dropoff "Karachi Airport" --hours 2
    Quote {
        #[command(flatten)]
        trip: TripArgs,

        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
    },

    /// Price a trip and book a vehicle
    ///
    /// Without --vehicle the first offered vehicle is booked.
    Book {
        #[command(flatten)]
        trip: TripArgs,

        /// Vehicle id from the catalog
        #[arg(long)]
        vehicle: Option<String>,

        /// Customer name
        #[arg(long)]
        name: String,

        /// Customer email (invoice recipient)
        #[arg(long)]
        email: String,

        /// Customer phone
        #[arg(long)]
        phone: String,

        /// Customer address
        #[arg(long)]
        address: String,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the vehicle catalog
    Vehicles {
        #[command(subcommand)]
        command: VehicleCommands,
    },

    /// Inspect and manage stored bookings
    Bookings {
        #[command(subcommand)]
        command: BookingCommands,
    },

    /// Decode an encoded polyline into coordinates
    DecodePolyline {
        /// Encoded polyline
        encoded: String,
    },
}

#[derive(Subcommand, Debug)]
enum VehicleCommands {
    /// List the catalog
    List {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a vehicle
    Add(NewVehicleArgs),

    /// Change fields of an existing vehicle
    Update(VehiclePatchArgs),

    /// Remove a vehicle
    Remove {
        /// Vehicle id
        id: String,
    },
}

#[derive(Args, Debug, Clone)]
struct NewVehicleArgs {
    /// Catalog id
    id: String,

    /// Display name
    #[arg(long)]
    model: String,

    /// Price per booked hour
    #[arg(long)]
    per_hour: f64,

    /// Price per kilometre (defaults to the pricing policy rate)
    #[arg(long)]
    per_km: Option<f64>,

    /// Flat fee per trip
    #[arg(long, default_value_t = 0.0)]
    base_fee: f64,

    /// Passenger seats
    #[arg(long, default_value_t = 0)]
    capacity: u32,

    /// Luggage pieces
    #[arg(long, default_value_t = 0)]
    luggage: u32,

    /// Model year
    #[arg(long, default_value_t = 0)]
    year: u16,
}

impl NewVehicleArgs {
    fn into_vehicle(self) -> Vehicle {
        let mut vehicle = Vehicle::new(self.id, self.model, self.per_hour);
        vehicle.per_km_rate = self.per_km;
        vehicle.base_fee = self.base_fee;
        vehicle.capacity = self.capacity;
        vehicle.luggage_space = self.luggage;
        vehicle.model_year = self.year;
        vehicle
    }
}

#[derive(Args, Debug, Clone)]
struct VehiclePatchArgs {
    /// Catalog id
    id: String,

    /// New display name
    #[arg(long)]
    model: Option<String>,

    #[arg(long)]
    per_hour: Option<f64>,

    #[arg(long)]
    per_km: Option<f64>,

    #[arg(long)]
    base_fee: Option<f64>,

    #[arg(long)]
    capacity: Option<u32>,

    #[arg(long)]
    luggage: Option<u32>,

    #[arg(long)]
    year: Option<u16>,
}

impl VehiclePatchArgs {
    fn apply(self, mut vehicle: Vehicle) -> Vehicle {
        if let Some(model) = self.model {
            vehicle.model_name = model;
        }
        if let Some(rate) = self.per_hour {
            vehicle.per_hour_rate = rate;
        }
        if self.per_km.is_some() {
            vehicle.per_km_rate = self.per_km;
        }
        if let Some(fee) = self.base_fee {
            vehicle.base_fee = fee;
        }
        if let Some(capacity) = self.capacity {
            vehicle.capacity = capacity;
        }
        if let Some(luggage) = self.luggage {
            vehicle.luggage_space = luggage;
        }
        if let Some(year) = self.year {
            vehicle.model_year = year;
        }
        vehicle
    }
}

#[derive(Subcommand, Debug)]
enum BookingCommands {
    /// List stored bookings, newest first
    List {
        /// Print the bookings as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one booking
    Show {
        #[arg(value_parser = parse_booking_id)]
        id: BookingId,

        /// Print the booking as JSON
        #[arg(long)]
        json: bool,
    },

    /// Cancel a pending or confirmed booking
    Cancel {
        #[arg(value_parser = parse_booking_id)]
        id: BookingId,
    },

    /// Mark a confirmed booking as completed
    Complete {
        #[arg(value_parser = parse_booking_id)]
        id: BookingId,
    },

    /// Delete a booking record
    Delete {
        #[arg(value_parser = parse_booking_id)]
        id: BookingId,
    },
}

fn parse_booking_id(raw: &str) -> Result<BookingId, String> {
    BookingId::parse(raw.trim()).map_err(|e| format!("not a booking id: {e}"))
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// One line per offered vehicle
fn format_fare_line(fare: &VehicleFare, currency: &str) -> String {
    let f = &fare.fare;
    format!(
        "{:<12} {:<24} {:>10.2} {}  (base {:.2} + hours {:.2} + distance {:.2} + time {:.2} + toll {:.2})",
        fare.vehicle_id().as_str(),
        fare.vehicle.model_name,
        f.total,
        currency.to_uppercase(),
        f.base_fee,
        f.hour_fare,
        f.distance_fare,
        f.time_fare,
        f.toll_fare,
    )
}

fn print_quote(quote: &TripQuote, currency: &str) {
    println!("🗺️  Route: {} → {}", quote.pickup, quote.dropoff);
    println!("   {}", quote.route.summary());
    println!(
        "🛣️  Toll: {:.2} ({})",
        quote.toll.amount(),
        quote.toll.classification
    );
    println!();
    if quote.fares.is_empty() {
        println!("⚠️  No vehicles configured");
    }
    for fare in &quote.fares {
        println!("{}", format_fare_line(fare, currency));
    }
}

fn side_effect_line(label: &str, status: &SideEffectStatus) -> String {
    match status {
        SideEffectStatus::Succeeded(Some(reference)) => format!("✅ {label}: {reference}"),
        SideEffectStatus::Succeeded(None) => format!("✅ {label}"),
        SideEffectStatus::Failed(reason) => format!("❌ {label}: {reason}"),
        SideEffectStatus::Skipped(reason) => format!("⏭️  {label}: {reason}"),
    }
}

fn print_outcome(outcome: &ConfirmationOutcome, currency: &str) {
    let booking = &outcome.booking;
    println!("🎫 Booking {} ({})", booking.id, booking.status);
    println!(
        "   {} · {} · {:.2} {}",
        booking.vehicle_name,
        booking.trip.date,
        booking.total_fare,
        currency.to_uppercase()
    );
    println!("   {}", side_effect_line("Stored", &outcome.persistence));
    println!("   {}", side_effect_line("Invoice", &outcome.invoice));
    println!("   {}", side_effect_line("Payment", &outcome.payment));
}

fn format_vehicle_line(vehicle: &Vehicle, default_per_km: f64) -> String {
    format!(
        "{:<12} {:<24} {} seats, {} bags, {:.2}/h, {:.2}/km, fee {:.2}",
        vehicle.id.as_str(),
        vehicle.model_name,
        vehicle.capacity,
        vehicle.luggage_space,
        vehicle.per_hour_rate,
        vehicle.per_km_rate.unwrap_or(default_per_km),
        vehicle.base_fee
    )
}

fn format_booking_line(booking: &Booking, currency: &str) -> String {
    format!(
        "{}  {:<10} {} {}  {:<20} {:<20} {:>10.2} {}",
        booking.id,
        booking.status.to_string(),
        booking.trip.date,
        booking.trip.time,
        booking.vehicle_name,
        booking.customer.name,
        booking.total_fare,
        currency.to_uppercase()
    )
}

fn print_booking(booking: &Booking, currency: &str) {
    println!("🎫 Booking {} ({})", booking.id, booking.status);
    println!("   Created:  {}", booking.created_at.to_rfc3339());
    println!(
        "   Trip:     {} → {} on {} at {} ({:.1} h, {} passengers, {})",
        booking.trip.pickup,
        booking.trip.dropoff,
        booking.trip.date,
        booking.trip.time,
        booking.trip.hours,
        booking.trip.passengers,
        booking.trip.transfer_type
    );
    println!(
        "   Route:    {:.1} km, {} min",
        booking.distance_km, booking.duration_min
    );
    println!("   Vehicle:  {} ({})", booking.vehicle_name, booking.vehicle_id);
    println!(
        "   Customer: {} <{}> {} · {}",
        booking.customer.name, booking.customer.email, booking.customer.phone, booking.customer.address
    );
    println!(
        "   Total:    {:.2} {} (invoice {})",
        booking.total_fare,
        currency.to_uppercase(),
        if booking.invoice_sent { "sent" } else { "not sent" }
    );
}

async fn run_vehicle_command(
    command: VehicleCommands,
    storage: &Storage,
    default_per_km: f64,
) -> anyhow::Result<()> {
    let catalog = storage.catalog_service();
    match command {
        VehicleCommands::List { json } => {
            let vehicles = catalog.list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&vehicles)?);
            } else if vehicles.is_empty() {
                println!("⚠️  No vehicles in the catalog. Add one with `vehicles add`.");
            } else {
                println!("🚘 Vehicles:");
                for vehicle in &vehicles {
                    println!("   {}", format_vehicle_line(vehicle, default_per_km));
                }
            }
        },
        VehicleCommands::Add(args) => {
            let vehicle = catalog.add(args.into_vehicle()).await?;
            println!("✅ Added {}", format_vehicle_line(&vehicle, default_per_km));
        },
        VehicleCommands::Update(args) => {
            let existing = catalog.get(&VehicleId::new(args.id.clone())).await?;
            let vehicle = catalog.update(args.apply(existing)).await?;
            println!("✅ Updated {}", format_vehicle_line(&vehicle, default_per_km));
        },
        VehicleCommands::Remove { id } => {
            let id = VehicleId::new(id);
            catalog.remove(&id).await?;
            println!("🗑️  Removed vehicle {id}");
        },
    }
    Ok(())
}

async fn run_booking_command(
    command: BookingCommands,
    storage: &Storage,
    currency: &str,
) -> anyhow::Result<()> {
    let admin = storage.booking_admin();
    match command {
        BookingCommands::List { json } => {
            let bookings = admin.list().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&bookings)?);
            } else if bookings.is_empty() {
                println!("📭 No bookings yet");
            } else {
                for booking in &bookings {
                    println!("{}", format_booking_line(booking, currency));
                }
            }
        },
        BookingCommands::Show { id, json } => {
            let booking = admin.get(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&booking)?);
            } else {
                print_booking(&booking, currency);
            }
        },
        BookingCommands::Cancel { id } => {
            let booking = admin.cancel(&id).await?;
            info!(booking_id = %booking.id, "Booking cancelled");
            println!("🚫 Booking {} is now {}", booking.id, booking.status);
        },
        BookingCommands::Complete { id } => {
            let booking = admin.complete(&id).await?;
            println!("🏁 Booking {} is now {}", booking.id, booking.status);
        },
        BookingCommands::Delete { id } => {
            admin.delete(&id).await?;
            println!("🗑️  Deleted booking {id}");
        },
    }
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<AppConfig> {
    let config = AppConfig::load_from(path).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if cli.verbose > 0 {
        config.telemetry.log_filter = log_filter_from_verbosity(cli.verbose).to_string();
    }
    init_telemetry(&config.telemetry)?;

    let today = Local::now().date_naive();

    match cli.command {
        Commands::Quote { trip, json } => {
            let trip = trip.into_trip(today);
            trip.validate()?;
            let services = Services::build(&config, Storage::open(&config).await?)?;

            let quote = tokio::select! {
                quote = services.pricing.quote(&trip) => quote?,
                _ = tokio::signal::ctrl_c() => anyhow::bail!("Pricing cancelled"),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                print_quote(&quote, &services.currency);
            }
        },

        Commands::Book {
            trip,
            vehicle,
            name,
            email,
            phone,
            address,
            json,
        } => {
            let customer = CustomerInfo::new(name, email, phone, address);
            customer.validate()?;

            let services = Services::build(&config, Storage::open(&config).await?)?;
            let mut workflow = services.workflow(today);
            workflow.update_trip(trip.into_trip(today))?;

            let (abort, registration) = AbortHandle::new_pair();
            let ctrl_c = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    abort.abort();
                }
            });
            let priced = workflow.submit_trip_abortable(registration).await.map(|quote| {
                if !json {
                    print_quote(quote, &services.currency);
                    println!();
                }
            });
            ctrl_c.abort();
            priced?;

            if let Some(vehicle) = vehicle {
                workflow.select_vehicle(VehicleId::new(vehicle))?;
            }
            workflow.continue_to_customer_info()?;
            workflow.update_customer(customer)?;
            workflow.continue_to_review()?;

            let outcome = workflow.confirm().await?;
            info!(booking_id = %outcome.booking.id, "Booking complete");

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_outcome(&outcome, &services.currency);
            }
        },

        Commands::Vehicles { command } => {
            let storage = Storage::open(&config).await?;
            run_vehicle_command(command, &storage, config.pricing.default_per_km_rate).await?;
        },

        Commands::Bookings { command } => {
            let storage = Storage::open(&config).await?;
            run_booking_command(command, &storage, &config.pricing.currency).await?;
        },

        Commands::DecodePolyline { encoded } => {
            let path = polyline::decode(&encoded);
            if path.is_empty() {
                println!("⚠️  Polyline decoded to no points");
            }
            for point in &path {
                println!("{:.5},{:.5}", point.latitude(), point.longitude());
            }
        },
    }

    Ok(())
}
