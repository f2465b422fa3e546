//! SQLite booking store implementation
//!
//! Implements the `BookingRepositoryPort` for persisting confirmed bookings.

use std::sync::Arc;

use application::{ApplicationError, ports::BookingRepositoryPort};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use domain::{
    Booking, BookingId, BookingPatch, BookingStatus, CustomerInfo, FareBreakdown, TransferType,
    TripDetails, VehicleId,
};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, named_params};
use tracing::{debug, instrument};

use super::connection::{ConnectionPool, persistence_error, with_connection};
use super::parse_column;

const SELECT_BOOKING: &str = "SELECT id, pickup, dropoff, trip_date, trip_time, hours, passengers,
        transfer_type, vehicle_id, vehicle_name, vehicle_rate, customer_name, customer_email,
        customer_phone, customer_address, distance_km, duration_min, base_fare, fare_base_fee,
        fare_hour, fare_distance, fare_time, fare_toll, fare_total, total_fare, status,
        invoice_sent, created_at
    FROM bookings";

/// SQLite-based booking store
#[derive(Debug, Clone)]
pub struct SqliteBookingStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteBookingStore {
    /// Create a new SQLite booking store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

fn not_found(id: &BookingId) -> ApplicationError {
    ApplicationError::NotFound(format!("Booking {id}"))
}

fn key(id: &BookingId) -> String {
    id.as_uuid().to_string()
}

fn fetch(conn: &Connection, id: &str) -> Result<Option<Booking>, ApplicationError> {
    conn.query_row(
        &format!("{SELECT_BOOKING} WHERE id = ?1"),
        [id],
        row_to_booking,
    )
    .optional()
    .map_err(persistence_error)
}

#[async_trait]
impl BookingRepositoryPort for SqliteBookingStore {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn create_booking(&self, booking: &Booking) -> Result<Booking, ApplicationError> {
        let booking = booking.clone();

        with_connection(&self.pool, move |conn| {
            let trip = &booking.trip;
            let customer = &booking.customer;
            let fare = &booking.fare;

            let inserted = conn.execute(
                "INSERT INTO bookings (id, pickup, dropoff, trip_date, trip_time, hours, passengers,
                    transfer_type, vehicle_id, vehicle_name, vehicle_rate, customer_name,
                    customer_email, customer_phone, customer_address, distance_km, duration_min,
                    base_fare, fare_base_fee, fare_hour, fare_distance, fare_time, fare_toll,
                    fare_total, total_fare, status, invoice_sent, created_at)
                 VALUES (:id, :pickup, :dropoff, :trip_date, :trip_time, :hours, :passengers,
                    :transfer_type, :vehicle_id, :vehicle_name, :vehicle_rate, :customer_name,
                    :customer_email, :customer_phone, :customer_address, :distance_km,
                    :duration_min, :base_fare, :fare_base_fee, :fare_hour, :fare_distance,
                    :fare_time, :fare_toll, :fare_total, :total_fare, :status, :invoice_sent,
                    :created_at)",
                named_params! {
                    ":id": key(&booking.id),
                    ":pickup": trip.pickup,
                    ":dropoff": trip.dropoff,
                    ":trip_date": trip.date.to_string(),
                    ":trip_time": trip.time,
                    ":hours": trip.hours,
                    ":passengers": trip.passengers,
                    ":transfer_type": trip.transfer_type.to_string(),
                    ":vehicle_id": booking.vehicle_id.as_str(),
                    ":vehicle_name": booking.vehicle_name,
                    ":vehicle_rate": booking.vehicle_rate,
                    ":customer_name": customer.name,
                    ":customer_email": customer.email,
                    ":customer_phone": customer.phone,
                    ":customer_address": customer.address,
                    ":distance_km": booking.distance_km,
                    ":duration_min": booking.duration_min,
                    ":base_fare": booking.base_fare,
                    ":fare_base_fee": fare.base_fee,
                    ":fare_hour": fare.hour_fare,
                    ":fare_distance": fare.distance_fare,
                    ":fare_time": fare.time_fare,
                    ":fare_toll": fare.toll_fare,
                    ":fare_total": fare.total,
                    ":total_fare": booking.total_fare,
                    ":status": booking.status.to_string(),
                    ":invoice_sent": booking.invoice_sent,
                    ":created_at": booking.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
                },
            );

            match inserted {
                Ok(_) => {
                    debug!("Booking stored");
                    Ok(booking)
                },
                Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => Err(
                    ApplicationError::Persistence(format!("Booking {} already exists", booking.id)),
                ),
                Err(e) => Err(persistence_error(e)),
            }
        })
        .await
    }

    #[instrument(skip(self), fields(booking_id = %id))]
    async fn get_booking(&self, id: &BookingId) -> Result<Option<Booking>, ApplicationError> {
        let id = key(id);
        with_connection(&self.pool, move |conn| fetch(conn, &id)).await
    }

    #[instrument(skip(self), fields(booking_id = %id))]
    async fn update_booking(
        &self,
        id: &BookingId,
        patch: BookingPatch,
    ) -> Result<Booking, ApplicationError> {
        let booking_id = *id;

        with_connection(&self.pool, move |conn| {
            let id = key(&booking_id);
            let changed = conn
                .execute(
                    "UPDATE bookings
                     SET status = COALESCE(:status, status),
                         invoice_sent = COALESCE(:invoice_sent, invoice_sent)
                     WHERE id = :id",
                    named_params! {
                        ":status": patch.status.map(|s| s.to_string()),
                        ":invoice_sent": patch.invoice_sent,
                        ":id": id,
                    },
                )
                .map_err(persistence_error)?;
            if changed == 0 {
                return Err(not_found(&booking_id));
            }

            debug!(?patch, "Booking updated");
            fetch(conn, &id)?.ok_or_else(|| not_found(&booking_id))
        })
        .await
    }

    #[instrument(skip(self), fields(booking_id = %id))]
    async fn delete_booking(&self, id: &BookingId) -> Result<(), ApplicationError> {
        let booking_id = *id;

        with_connection(&self.pool, move |conn| {
            let deleted = conn
                .execute("DELETE FROM bookings WHERE id = ?1", [key(&booking_id)])
                .map_err(persistence_error)?;
            if deleted == 0 {
                return Err(not_found(&booking_id));
            }
            debug!("Booking deleted");
            Ok(())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_bookings(&self) -> Result<Vec<Booking>, ApplicationError> {
        with_connection(&self.pool, |conn| {
            let mut stmt = conn
                .prepare(&format!("{SELECT_BOOKING} ORDER BY created_at DESC, id DESC"))
                .map_err(persistence_error)?;
            let bookings = stmt
                .query_map([], row_to_booking)
                .map_err(persistence_error)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(persistence_error)?;

            debug!(count = bookings.len(), "Listed bookings");
            Ok(bookings)
        })
        .await
    }
}

/// Convert a database row to a `Booking`
fn row_to_booking(row: &Row<'_>) -> rusqlite::Result<Booking> {
    let trip = TripDetails {
        pickup: row.get("pickup")?,
        dropoff: row.get("dropoff")?,
        date: parse_column(row, "trip_date", str::parse::<NaiveDate>)?,
        time: row.get("trip_time")?,
        hours: row.get("hours")?,
        passengers: row.get("passengers")?,
        transfer_type: parse_column(row, "transfer_type", str::parse::<TransferType>)?,
    };

    let customer = CustomerInfo {
        name: row.get("customer_name")?,
        email: row.get("customer_email")?,
        phone: row.get("customer_phone")?,
        address: row.get("customer_address")?,
    };

    let fare = FareBreakdown {
        base_fee: row.get("fare_base_fee")?,
        hour_fare: row.get("fare_hour")?,
        distance_fare: row.get("fare_distance")?,
        time_fare: row.get("fare_time")?,
        toll_fare: row.get("fare_toll")?,
        total: row.get("fare_total")?,
    };

    Ok(Booking {
        id: parse_column(row, "id", BookingId::parse)?,
        trip,
        vehicle_id: VehicleId::new(row.get::<_, String>("vehicle_id")?),
        vehicle_name: row.get("vehicle_name")?,
        vehicle_rate: row.get("vehicle_rate")?,
        customer,
        distance_km: row.get("distance_km")?,
        duration_min: row.get("duration_min")?,
        base_fare: row.get("base_fare")?,
        fare,
        total_fare: row.get("total_fare")?,
        status: parse_column(row, "status", str::parse::<BookingStatus>)?,
        invoice_sent: row.get("invoice_sent")?,
        created_at: parse_column(row, "created_at", |s| {
            DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
        })?,
    })
}
