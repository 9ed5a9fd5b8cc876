//! Tests for gazetteer loading and address resolution

mod loader_tests;

use super::{Gazetteer, GeoRecord};

/// A small mixed-province gazetteer used across the resolver tests
pub fn sample_gazetteer() -> Gazetteer {
    let rows = [
        // province, county, municipality, city, district
        ("Mazowieckie", "Warszawa", "Warszawa", "Warszawa", "Mokotów"),
        ("Mazowieckie", "Warszawa", "Warszawa", "Warszawa", "Wola"),
        ("Mazowieckie", "piaseczyński", "Lesznowola", "Nowa Wola", ""),
        ("Mazowieckie", "piaseczyński", "Lesznowola", "Zamienie", ""),
        ("Mazowieckie", "piaseczyński", "Lesznowola", "Zamienie", "Kolonia Zamienie"),
        ("Małopolskie", "Kraków", "Kraków", "Kraków", "Podgórze"),
        ("Małopolskie", "Kraków", "Kraków", "Kraków", "Krowodrza"),
        ("Lubelskie", "zamojski", "Zamość", "Kolonia Zamość", ""),
    ];

    let records = rows
        .iter()
        .map(|(province, county, municipality, city, district)| {
            GeoRecord::new(province, county, municipality, city, district)
        })
        .collect();

    Gazetteer::new(records, "fixture")
}
