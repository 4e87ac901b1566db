mod end_to_end;
mod forecast_scenarios;

use std::io::Write;
use std::path::Path;

/// Daily production with a yearly cycle, plus a date column
pub fn write_production_csv(path: &Path, days: usize) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "Date,Daily Power Production").unwrap();
    let start = chrono::NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
    for day in 0..days {
        let date = start + chrono::Duration::days(day as i64);
        let season = (day as f64 * std::f64::consts::TAU / 365.0).sin();
        let weekly = ((day % 7) as f64 - 3.0) * 0.4;
        writeln!(file, "{},{:.3}", date, 20.0 + 12.0 * season + weekly).unwrap();
    }
}
