// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message rendering: HTML document plus plain-text alternative.
//!
//! Missing detail fields render as "NA" rather than being skipped, so every
//! entry has the same shape. Addresses link to Google Maps when coordinates
//! are available.

use chrono::{DateTime, Datelike, Duration, FixedOffset};

use tavola_core::{EntityRecord, FulfillmentRequest};

/// Subject line for a recommendation email.
pub fn subject(request: &FulfillmentRequest, count: usize) -> String {
    format!(
        "Top {count} {} Restaurants in {}",
        request.cuisine, request.area
    )
}

pub fn no_matches_subject(request: &FulfillmentRequest) -> String {
    format!("No {} Restaurants Found in {}", request.cuisine, request.area)
}

/// HTML body listing each recommendation with rating, reviews, address, and
/// phone.
pub fn render_html(
    request: &FulfillmentRequest,
    entities: &[EntityRecord],
    now: DateTime<FixedOffset>,
) -> String {
    let intro = intro_line(request, entities.len(), now);
    let mut entries = String::new();
    for (i, entity) in entities.iter().enumerate() {
        let name = escape(&na(entity.name.as_str()));
        let rating = format!("{:.1}", entity.rating);
        let address = address_html(entity, request);
        let phone = escape(&na_opt(entity.phone.as_deref()));
        entries.push_str(&format!(
            "<div style=\"margin-bottom: 20px; padding: 15px; background-color: #f9f9f9; \
             border-left: 3px solid #C9A96E; border-radius: 4px;\">\n\
             <div style=\"font-size: 16px; font-weight: bold; color: #333;\">{number}. {name} {stars}</div>\n\
             <div style=\"color: #666;\">({rating}/5, {reviews} reviews)</div>\n\
             <div style=\"margin-top: 8px; color: #555;\">{address}</div>\n\
             <div style=\"margin-top: 4px; color: #555;\">{phone}</div>\n\
             </div>\n",
            number = i + 1,
            stars = stars(entity.rating),
            reviews = entity.review_count,
        ));
    }
    format!(
        "<html><head><meta charset=\"UTF-8\"></head>\n\
         <body style=\"font-family: Arial, sans-serif; line-height: 1.6; color: #333; \
         max-width: 600px; margin: 0 auto; padding: 20px;\">\n\
         <h1 style=\"font-size: 24px; color: #C9A96E;\">Your Restaurant Recommendations</h1>\n\
         <p>Hello!</p>\n\
         <p>{intro}</p>\n\
         {entries}\
         <p style=\"margin-top: 30px;\">Enjoy your meal!</p>\n\
         <div style=\"margin-top: 30px; padding-top: 20px; border-top: 1px solid #ddd; \
         font-size: 12px; color: #999;\">Powered by Tavola</div>\n\
         </body></html>\n"
    )
}

/// Plain-text alternative carrying the same information.
pub fn render_text(
    request: &FulfillmentRequest,
    entities: &[EntityRecord],
    now: DateTime<FixedOffset>,
) -> String {
    let intro = intro_line(request, entities.len(), now);
    let mut body = format!("Hello!\n\n{intro}\n\n");
    for (i, entity) in entities.iter().enumerate() {
        body.push_str(&format!(
            "{number}. {name} {stars} ({rating:.1}/5, {reviews} reviews)\n   {address}\n   {phone}\n\n",
            number = i + 1,
            name = na(&entity.name),
            stars = stars(entity.rating),
            rating = entity.rating,
            reviews = entity.review_count,
            address = full_address(entity, request),
            phone = na_opt(entity.phone.as_deref()),
        ));
    }
    body.push_str("Enjoy your meal!\n\n---\nPowered by Tavola\n");
    body
}

/// Bodies for the terminal "no matches" outcome.
pub fn render_no_matches(request: &FulfillmentRequest) -> (String, String) {
    let text = format!(
        "Hello!\n\nUnfortunately I could not find any {cuisine} restaurants in {area}. \
         You could try a different cuisine or a nearby area.\n\n---\nPowered by Tavola\n",
        cuisine = request.cuisine,
        area = request.area,
    );
    let html = format!(
        "<html><body style=\"font-family: Arial, sans-serif; color: #333;\">\n\
         <p>Hello!</p>\n\
         <p>Unfortunately I could not find any <strong>{cuisine}</strong> restaurants in \
         <strong>{area}</strong>. You could try a different cuisine or a nearby area.</p>\n\
         <div style=\"margin-top: 30px; font-size: 12px; color: #999;\">Powered by Tavola</div>\n\
         </body></html>\n",
        cuisine = request.cuisine,
        area = request.area,
    );
    (text, html)
}

fn intro_line(request: &FulfillmentRequest, count: usize, now: DateTime<FixedOffset>) -> String {
    format!(
        "Here are my top {count} {cuisine} restaurant recommendations in {area} for \
         {party} people {date} at {time}:",
        cuisine = request.cuisine,
        area = request.area,
        party = request.party_size,
        date = date_phrase(request.dining_at, now),
        time = time_12h(request.dining_at),
    )
}

/// "today", "tomorrow", or "on <Month day>" relative to the current date in
/// the request's zone.
fn date_phrase(dining_at: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> String {
    let today = now.with_timezone(dining_at.offset()).date_naive();
    let date = dining_at.date_naive();
    if date == today {
        "today".to_string()
    } else if date == today + Duration::days(1) {
        "tomorrow".to_string()
    } else {
        format!("on {} {}", month_name(date.month()), date.day())
    }
}

fn time_12h(dining_at: DateTime<FixedOffset>) -> String {
    dining_at.format("%-I:%M %p").to_string()
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

fn stars(rating: f64) -> String {
    let filled = (rating.floor() as i64).clamp(0, 5) as usize;
    "\u{2605}".repeat(filled)
}

fn na(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "NA".to_string()
    } else {
        trimmed.to_string()
    }
}

fn na_opt(value: Option<&str>) -> String {
    value.map(na).unwrap_or_else(|| "NA".to_string())
}

fn full_address(entity: &EntityRecord, request: &FulfillmentRequest) -> String {
    match entity.address.as_deref().map(str::trim) {
        Some(address) if !address.is_empty() => format!("{address}, {}", request.area),
        _ => request.area.to_string(),
    }
}

fn address_html(entity: &EntityRecord, request: &FulfillmentRequest) -> String {
    let address = escape(&full_address(entity, request));
    match (entity.latitude, entity.longitude) {
        (Some(lat), Some(lon)) => format!(
            "<a href=\"https://maps.google.com/?q={lat},{lon}\" \
             style=\"color: #4285F4; text-decoration: none;\">{address}</a>"
        ),
        _ => address,
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tavola_core::{Cuisine, RequestId, ServiceArea, UserKey};

    fn request() -> FulfillmentRequest {
        FulfillmentRequest {
            request_id: RequestId("req-1".to_string()),
            user_key: UserKey("abc".to_string()),
            area: ServiceArea::Manhattan,
            cuisine: Cuisine::Japanese,
            party_size: 4,
            dining_at: "2026-09-03T19:30:00-05:00".parse().unwrap(),
            contact_address: "diner@example.com".to_string(),
        }
    }

    fn entity() -> EntityRecord {
        EntityRecord {
            entity_id: "r1".to_string(),
            name: "Sushi & Co".to_string(),
            address: Some("1 Astor Pl".to_string()),
            latitude: Some(40.73),
            longitude: Some(-73.99),
            review_count: 321,
            rating: 4.6,
            phone: Some("+1-212-555-0100".to_string()),
            cuisine: Cuisine::Japanese,
            area: ServiceArea::Manhattan,
            price_range: Some("$$".to_string()),
            categories: vec![],
            inserted_at: String::new(),
        }
    }

    fn now() -> DateTime<FixedOffset> {
        "2026-09-02T12:00:00-05:00".parse().unwrap()
    }

    #[test]
    fn subject_names_cuisine_and_area() {
        assert_eq!(
            subject(&request(), 3),
            "Top 3 Japanese Restaurants in Manhattan"
        );
    }

    #[test]
    fn html_links_address_to_google_maps() {
        let html = render_html(&request(), &[entity()], now());
        assert!(html.contains("https://maps.google.com/?q=40.73,-73.99"));
        assert!(html.contains("1 Astor Pl, Manhattan"));
        assert!(html.contains("Sushi &amp; Co"));
        assert!(html.contains("(4.6/5, 321 reviews)"));
        assert!(html.contains("\u{2605}\u{2605}\u{2605}\u{2605}"));
    }

    #[test]
    fn missing_fields_render_as_na() {
        let mut sparse = entity();
        sparse.address = None;
        sparse.latitude = None;
        sparse.longitude = None;
        sparse.phone = None;

        let text = render_text(&request(), &[sparse], now());
        assert!(text.contains("NA"));
        assert!(text.contains("Manhattan"));
        assert!(!text.contains("maps.google.com"));
    }

    #[test]
    fn intro_uses_tomorrow_and_twelve_hour_time() {
        let text = render_text(&request(), &[entity()], now());
        assert!(text.contains("for 4 people tomorrow at 7:30 PM"), "{text}");
    }

    #[test]
    fn far_future_date_is_spelled_out() {
        let mut request = request();
        request.dining_at = "2026-12-25T18:00:00-05:00".parse().unwrap();
        let text = render_text(&request, &[entity()], now());
        assert!(text.contains("on December 25 at 6:00 PM"), "{text}");
    }

    #[test]
    fn no_matches_bodies_name_the_combination() {
        let (text, html) = render_no_matches(&request());
        assert!(text.contains("Japanese restaurants in Manhattan"));
        assert!(html.contains("<strong>Japanese</strong>"));
    }
}
