// Insert sample violations spread over the last week (for trying the dashboard locally).
//
// Usage: cargo run --example seed_violations -- [DB_PATH] [COUNT]
//   DB_PATH  default: ./data/violations.db
//   COUNT    default: 50

use parkwatch::aggregator::MS_PER_DAY;
use parkwatch::dashboard::now_ms;
use parkwatch::models::NewViolation;
use parkwatch::violation_repo::ViolationRepo;
use std::env;

const VEHICLE_TYPES: [&str; 4] = ["car", "truck", "motorcycle", "bus"];
const COLORS: [&str; 5] = ["white", "black", "red", "blue", "silver"];
const LOCATIONS: [&str; 3] = ["Gate A", "Main Street", "Loading Bay"];
const PLATES: [&str; 6] = ["KA-01-1234", "MH-12-9876", "DL-3C-4567", "TN-09-1111", "KA-05-7777", "GJ-01-2020"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let path = args.get(1).map(String::as_str).unwrap_or("./data/violations.db");
    let count: usize = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(50);

    let repo = ViolationRepo::connect(path, 1).await?;
    repo.init().await?;

    let now = now_ms();
    let step = (7 * MS_PER_DAY) / count.max(1) as i64;
    for i in 0..count {
        let violation = NewViolation {
            timestamp: Some(now - step * i as i64),
            vehicle_type: Some(VEHICLE_TYPES[i % VEHICLE_TYPES.len()].into()),
            // every seventh detection has an unreadable plate
            plate_number: (i % 7 != 0).then(|| PLATES[(i * 5) % PLATES.len()].into()),
            color: Some(COLORS[i % COLORS.len()].into()),
            duration: Some(((i * 13) % 90) as f64 + 0.5),
            status: Some(if i % 3 == 0 { "active" } else { "resolved" }.into()),
            location: Some(LOCATIONS[i % LOCATIONS.len()].into()),
            image_url: None,
        };
        repo.insert_violation(&violation).await?;
    }

    println!("inserted {} violations into {}", count, path);
    Ok(())
}
