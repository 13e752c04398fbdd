//! Built-in holiday tables.
//!
//! Observed closure dates, hardcoded per year. A year is either fully listed
//! or absent; calendars built from these tables report dates in absent years
//! as unavailable.
//!
//! The tables end at a fixed year and must be extended each year, before the
//! last covered year runs out. `xvol calendar coverage` prints what each venue
//! currently covers.

/// NYSE full-day closures, 2023–2027.
pub const NYSE_YEARS: (i32, i32) = (2023, 2027);

pub const NYSE_CLOSURES: &[(i32, u32, u32, &str)] = &[
    // ── 2023 ─────────────────────────────────────────────────────────
    (2023, 1, 2, "New Year's Day (observed)"),
    (2023, 1, 16, "Martin Luther King Jr. Day"),
    (2023, 2, 20, "Washington's Birthday"),
    (2023, 4, 7, "Good Friday"),
    (2023, 5, 29, "Memorial Day"),
    (2023, 6, 19, "Juneteenth"),
    (2023, 7, 4, "Independence Day"),
    (2023, 9, 4, "Labor Day"),
    (2023, 11, 23, "Thanksgiving Day"),
    (2023, 12, 25, "Christmas Day"),
    // ── 2024 ─────────────────────────────────────────────────────────
    (2024, 1, 1, "New Year's Day"),
    (2024, 1, 15, "Martin Luther King Jr. Day"),
    (2024, 2, 19, "Washington's Birthday"),
    (2024, 3, 29, "Good Friday"),
    (2024, 5, 27, "Memorial Day"),
    (2024, 6, 19, "Juneteenth"),
    (2024, 7, 4, "Independence Day"),
    (2024, 9, 2, "Labor Day"),
    (2024, 11, 28, "Thanksgiving Day"),
    (2024, 12, 25, "Christmas Day"),
    // ── 2025 ─────────────────────────────────────────────────────────
    (2025, 1, 1, "New Year's Day"),
    (2025, 1, 9, "National Day of Mourning"),
    (2025, 1, 20, "Martin Luther King Jr. Day"),
    (2025, 2, 17, "Washington's Birthday"),
    (2025, 4, 18, "Good Friday"),
    (2025, 5, 26, "Memorial Day"),
    (2025, 6, 19, "Juneteenth"),
    (2025, 7, 4, "Independence Day"),
    (2025, 9, 1, "Labor Day"),
    (2025, 11, 27, "Thanksgiving Day"),
    (2025, 12, 25, "Christmas Day"),
    // ── 2026 ─────────────────────────────────────────────────────────
    (2026, 1, 1, "New Year's Day"),
    (2026, 1, 19, "Martin Luther King Jr. Day"),
    (2026, 2, 16, "Washington's Birthday"),
    (2026, 4, 3, "Good Friday"),
    (2026, 5, 25, "Memorial Day"),
    (2026, 6, 19, "Juneteenth"),
    (2026, 7, 3, "Independence Day (observed)"),
    (2026, 9, 7, "Labor Day"),
    (2026, 11, 26, "Thanksgiving Day"),
    (2026, 12, 25, "Christmas Day"),
    // ── 2027 ─────────────────────────────────────────────────────────
    (2027, 1, 1, "New Year's Day"),
    (2027, 1, 18, "Martin Luther King Jr. Day"),
    (2027, 2, 15, "Washington's Birthday"),
    (2027, 3, 26, "Good Friday"),
    (2027, 5, 31, "Memorial Day"),
    (2027, 6, 18, "Juneteenth (observed)"),
    (2027, 7, 5, "Independence Day (observed)"),
    (2027, 9, 6, "Labor Day"),
    (2027, 11, 25, "Thanksgiving Day"),
    (2027, 12, 24, "Christmas Day (observed)"),
];

/// Argentine national holidays (Buenos Aires exchange), 2023–2027.
///
/// Includes movable holidays at their decreed dates and the tourism bridge
/// days (`puente`). Dates falling on weekends are listed for completeness.
/// Bridge days are decreed late in the prior year; until then add them through
/// `venues.bcba.extra_holidays`.
pub const BCBA_YEARS: (i32, i32) = (2023, 2027);

pub const BCBA_HOLIDAYS: &[(i32, u32, u32, &str)] = &[
    // ── 2023 ─────────────────────────────────────────────────────────
    (2023, 1, 1, "Año Nuevo"),
    (2023, 2, 20, "Carnaval"),
    (2023, 2, 21, "Carnaval"),
    (2023, 3, 24, "Día de la Memoria"),
    (2023, 4, 2, "Malvinas"),
    (2023, 4, 6, "Jueves Santo"),
    (2023, 4, 7, "Viernes Santo"),
    (2023, 5, 1, "Día del Trabajador"),
    (2023, 5, 25, "Revolución de Mayo"),
    (2023, 5, 26, "Puente"),
    (2023, 6, 17, "Güemes"),
    (2023, 6, 19, "Puente"),
    (2023, 6, 20, "Belgrano"),
    (2023, 7, 9, "Independencia"),
    (2023, 8, 21, "San Martín"),
    (2023, 10, 13, "Puente"),
    (2023, 10, 16, "Diversidad Cultural"),
    (2023, 11, 20, "Soberanía Nacional"),
    (2023, 12, 8, "Inmaculada Concepción"),
    (2023, 12, 25, "Navidad"),
    // ── 2024 ─────────────────────────────────────────────────────────
    (2024, 1, 1, "Año Nuevo"),
    (2024, 2, 12, "Carnaval"),
    (2024, 2, 13, "Carnaval"),
    (2024, 3, 24, "Día de la Memoria"),
    (2024, 3, 28, "Jueves Santo"),
    (2024, 3, 29, "Viernes Santo"),
    (2024, 4, 1, "Puente"),
    (2024, 4, 2, "Malvinas"),
    (2024, 5, 1, "Día del Trabajador"),
    (2024, 5, 25, "Revolución de Mayo"),
    (2024, 6, 17, "Güemes"),
    (2024, 6, 20, "Belgrano"),
    (2024, 6, 21, "Puente"),
    (2024, 7, 9, "Independencia"),
    (2024, 8, 17, "San Martín"),
    (2024, 10, 11, "Puente"),
    (2024, 10, 12, "Diversidad Cultural"),
    (2024, 11, 18, "Soberanía Nacional"),
    (2024, 12, 8, "Inmaculada Concepción"),
    (2024, 12, 25, "Navidad"),
    // ── 2025 ─────────────────────────────────────────────────────────
    (2025, 1, 1, "Año Nuevo"),
    (2025, 3, 3, "Carnaval"),
    (2025, 3, 4, "Carnaval"),
    (2025, 3, 24, "Día de la Memoria"),
    (2025, 4, 2, "Malvinas"),
    (2025, 4, 17, "Jueves Santo"),
    (2025, 4, 18, "Viernes Santo"),
    (2025, 5, 1, "Día del Trabajador"),
    (2025, 5, 2, "Puente"),
    (2025, 5, 25, "Revolución de Mayo"),
    (2025, 6, 16, "Güemes"),
    (2025, 6, 20, "Belgrano"),
    (2025, 7, 9, "Independencia"),
    (2025, 8, 15, "Puente"),
    (2025, 8, 17, "San Martín"),
    (2025, 10, 10, "Diversidad Cultural"),
    (2025, 11, 21, "Puente"),
    (2025, 11, 24, "Soberanía Nacional"),
    (2025, 12, 8, "Inmaculada Concepción"),
    (2025, 12, 25, "Navidad"),
    // ── 2026 ─────────────────────────────────────────────────────────
    (2026, 1, 1, "Año Nuevo"),
    (2026, 2, 16, "Carnaval"),
    (2026, 2, 17, "Carnaval"),
    (2026, 3, 23, "Puente"),
    (2026, 3, 24, "Día de la Memoria"),
    (2026, 4, 2, "Malvinas / Jueves Santo"),
    (2026, 4, 3, "Viernes Santo"),
    (2026, 5, 1, "Día del Trabajador"),
    (2026, 5, 25, "Revolución de Mayo"),
    (2026, 6, 15, "Güemes"),
    (2026, 6, 20, "Belgrano"),
    (2026, 7, 9, "Independencia"),
    (2026, 7, 10, "Puente"),
    (2026, 8, 17, "San Martín"),
    (2026, 10, 12, "Diversidad Cultural"),
    (2026, 11, 23, "Soberanía Nacional"),
    (2026, 12, 7, "Puente"),
    (2026, 12, 8, "Inmaculada Concepción"),
    (2026, 12, 25, "Navidad"),
    // ── 2027 ─────────────────────────────────────────────────────────
    (2027, 1, 1, "Año Nuevo"),
    (2027, 2, 8, "Carnaval"),
    (2027, 2, 9, "Carnaval"),
    (2027, 3, 24, "Día de la Memoria"),
    (2027, 3, 25, "Jueves Santo"),
    (2027, 3, 26, "Viernes Santo"),
    (2027, 4, 2, "Malvinas"),
    (2027, 5, 1, "Día del Trabajador"),
    (2027, 5, 25, "Revolución de Mayo"),
    (2027, 6, 20, "Belgrano"),
    (2027, 6, 21, "Güemes"),
    (2027, 7, 9, "Independencia"),
    (2027, 8, 16, "San Martín"),
    (2027, 10, 11, "Diversidad Cultural"),
    (2027, 11, 20, "Soberanía Nacional"),
    (2027, 12, 8, "Inmaculada Concepción"),
    (2027, 12, 25, "Navidad"),
];
