use crate::models::{Booking, BookingStatus, DeliveryMethod};

pub fn generate_ics(booking: &Booking, product_name: &str) -> String {
    let dtstart = booking.start_date.format("%Y%m%d").to_string();
    // DTEND is exclusive; the last representable date has no successor
    let dtend = booking
        .end_date
        .succ_opt()
        .unwrap_or(booking.end_date)
        .format("%Y%m%d")
        .to_string();
    let dtstamp = booking.updated_at.format("%Y%m%dT%H%M%SZ").to_string();
    let uid = format!("{}@gearrent", booking.id);

    let summary = format!("Rental: {}", escape_text(product_name));
    let handover = match booking.delivery_method {
        DeliveryMethod::Pickup => "Pickup from owner".to_string(),
        DeliveryMethod::Delivery => format!(
            "Delivery to {}",
            booking.delivery_address.as_deref().unwrap_or("address on file")
        ),
    };
    let description = escape_text(&format!(
        "{}. Status: {}. {} day(s), total {:.2}",
        handover,
        booking.status.label(),
        booking.rental_days(),
        booking.total_price
    ));
    let status = match booking.status {
        BookingStatus::Cancelled => "CANCELLED",
        BookingStatus::Pending => "TENTATIVE",
        _ => "CONFIRMED",
    };

    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Gearrent//Rental Bookings//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART;VALUE=DATE:{dtstart}\r\n\
         DTEND;VALUE=DATE:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         STATUS:{status}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}

fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}
