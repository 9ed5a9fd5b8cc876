//! Application constants for the PriceBot processor
//!
//! This module contains sentinel values, column alias tables, and tuning
//! defaults used throughout the report cleaning and valuation pipeline.

// =============================================================================
// Missing-value handling
// =============================================================================

/// Literal marker accepted as "no value" in report cells (besides an empty cell)
pub const MISSING_SENTINEL: &str = "---";

/// Written verbatim into all value columns of a row whose address could not
/// be completed from any reference source
pub const MANUAL_REVIEW_PLACEHOLDER: &str = "Proszę dopisz manualnie";

// =============================================================================
// Report and reference table vocabulary
// =============================================================================

/// The three derived value columns of a report, in output order
pub const VALUE_COLUMNS: &[&str] = &[
    "Średnia cena za m2 ( z bazy)",
    "Średnia skorygowana cena za m2",
    "Statystyczna wartość nieruchomości",
];

/// Header aliases per address level, tried in order against a file's headers.
/// Reports use the diacritic forms, scraped tables the ASCII forms.
pub mod column_aliases {
    pub const KW: &[&str] = &["nr kw", "nr_kw", "nrksiegi", "nr księgi", "nr_ksiegi", "numer księgi"];
    pub const PROVINCE: &[&str] = &["województwo", "wojewodztwo", "woj"];
    pub const COUNTY: &[&str] = &["powiat"];
    pub const MUNICIPALITY: &[&str] = &["gmina"];
    pub const CITY: &[&str] = &["miejscowość", "miejscowosc", "miasto"];
    pub const DISTRICT: &[&str] = &["dzielnica", "osiedle"];
    pub const STREET: &[&str] = &["ulica", "ulica(dla budynku)", "ulica(dla lokalu)"];
    pub const AREA: &[&str] = &["obszar", "metry", "powierzchnia", "m2"];
    pub const PRICE_PER_AREA: &[&str] = &[
        "cena_za_metr",
        "cena za metr",
        "cena za m²",
        "cena za m2",
        "cena/m2",
    ];
    pub const PRICE: &[&str] = &["cena"];
    pub const BUILD_YEAR: &[&str] = &["rok_budowy", "rok budowy"];
    pub const LINK: &[&str] = &["link"];
}

/// Required gazetteer columns (ASCII headers, as exported from TERYT)
pub const GAZETTEER_COLUMNS: &[&str] =
    &["Wojewodztwo", "Powiat", "Gmina", "Miejscowosc", "Dzielnica"];

/// Generic qualifier words ignored when matching place names
/// ("Nowa Wola" and "Wola" share a base key)
pub const GENERIC_PLACE_WORDS: &[&str] = &["kolonia", "kol.", "osiedle", "os.", "nowa", "stara"];

/// Unit markers stripped before numeric parsing, longest first
pub const UNIT_SUFFIXES: &[&str] = &["zł/m²", "zł/m2", "zł", "m²", "m2"];

// =============================================================================
// Merge vocabulary
// =============================================================================

/// Canonical column order of the unified comparables table
pub const MERGE_HEADERS: &[&str] = &[
    "cena",
    "cena_za_metr",
    "metry",
    "liczba_pokoi",
    "pietro",
    "rynek",
    "rok_budowy",
    "material",
    "wojewodztwo",
    "powiat",
    "gmina",
    "miejscowosc",
    "dzielnica",
    "ulica",
    "link",
];

/// Extra column recording the raw tail of rows that arrived with too many
/// fields and could not be repaired as a split price
pub const MERGE_ERROR_COLUMN: &str = "blad_importu";

/// Default glob pattern for region files inside the merge input directory
pub const MERGE_FILE_PATTERN: &str = "*.csv";

/// Canonical voivodeship names used to back-fill the region column from a
/// source file name
pub const VOIVODESHIPS: &[&str] = &[
    "Dolnośląskie",
    "Kujawsko-Pomorskie",
    "Lubelskie",
    "Lubuskie",
    "Łódzkie",
    "Małopolskie",
    "Mazowieckie",
    "Opolskie",
    "Podkarpackie",
    "Podlaskie",
    "Pomorskie",
    "Śląskie",
    "Świętokrzyskie",
    "Warmińsko-Mazurskie",
    "Wielkopolskie",
    "Zachodniopomorskie",
];

// =============================================================================
// Matching and estimation tuning
// =============================================================================

/// Minimum sample count before the IQR outlier fence is applied
pub const MIN_IQR_SAMPLES: usize = 4;

/// Fence multiplier: retain prices within [Q1 - k*IQR, Q3 + k*IQR]
pub const IQR_FENCE_MULTIPLIER: f64 = 1.5;

/// Default area window half-width in m²
pub const DEFAULT_AREA_MARGIN_M2: f64 = 15.0;

/// Default percentage discount applied to the average price per m²
pub const DEFAULT_DISCOUNT_PCT: f64 = 15.0;

/// How many additional rows a batch finishes after a stop request
pub const SOFT_STOP_EXTRA_ROWS: usize = 10;

// =============================================================================
// Default reference file names
// =============================================================================

/// Primary gazetteer file name (looked up in the working directory)
pub const DEFAULT_GAZETTEER_FILE: &str = "teryt.csv";

/// Secondary court-district table file name
pub const DEFAULT_COURTS_FILE: &str = "obszar_sadow.csv";
