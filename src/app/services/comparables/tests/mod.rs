//! Tests for comparable selection and valuation

mod loader_tests;

use super::{ComparablesDb, Listing};

/// Shorthand listing constructor: price, area, city, district, street
pub fn listing(price: &str, area: &str, city: &str, district: &str, street: &str) -> Listing {
    Listing::from_raw(price, area, "Mazowieckie", "Warszawa", "Warszawa", city, district, street)
}

/// A Warsaw-centric database used across the selector and estimator tests
pub fn sample_db() -> ComparablesDb {
    let listings = vec![
        listing("10000", "50", "Warszawa", "Mokotów", "Puławska"),
        listing("10500", "52", "Warszawa", "Mokotów", "Puławska"),
        listing("11000", "55", "Warszawa", "Mokotów", "Belwederska"),
        listing("9000", "48", "Warszawa", "Wola", "Górczewska"),
        listing("9500", "60", "Warszawa", "Wola", ""),
        listing("8000", "51", "Kraków", "Podgórze", ""),
        // area outside any 52±15 window
        listing("12000", "120", "Warszawa", "Mokotów", "Puławska"),
        // unparsable price inside the window
        listing("---", "53", "Warszawa", "Mokotów", "Puławska"),
    ];
    ComparablesDb::new(listings, "fixture")
}
