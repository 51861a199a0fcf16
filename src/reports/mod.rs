use chrono::Utc;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use lanesignal::api::AnalysisRecord;
use lanesignal::history::relative_age;
use lanesignal::scorer::{CongestionLevel, LaneSummary, TrafficMetrics};
use lanesignal::vehicles::{VehicleType, VehicleTypeCounts};

fn congestion_color(level: CongestionLevel) -> Color {
    match level {
        CongestionLevel::High => Color::Red,
        CongestionLevel::Medium => Color::Yellow,
        CongestionLevel::Low => Color::Green,
    }
}

fn format_types(counts: &VehicleTypeCounts) -> String {
    if counts.is_empty() {
        return "-".to_string();
    }
    counts
        .iter()
        .map(|(t, n)| format!("{}: {}", t, n))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_summary(record: &AnalysisRecord) {
    let r = &record.result;
    let header = match record.frame_index {
        Some(i) => format!("\n🚦 === ANALYSIS (frame {}) === 🚦", i),
        None => "\n🚦 === ANALYSIS === 🚦".to_string(),
    };
    println!("{}", header);

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Signal Recommendation").add_attribute(Attribute::Bold),
        Cell::new(r.recommendation.to_string()).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Total Vehicles"),
        Cell::new(r.total_vehicles),
    ]);
    table.add_row(vec![Cell::new("Lanes Detected"), Cell::new(r.lanes_detected)]);
    table.add_row(vec![
        Cell::new("Optimization Score"),
        Cell::new(format!("{:.1}%", r.optimization_score)),
    ]);
    table.add_row(vec![
        Cell::new("Processing Time"),
        Cell::new(format!("{:.2}s", record.processing_time)),
    ]);
    table.add_row(vec![Cell::new("Input"), Cell::new(record.input_type)]);
    table.add_row(vec![Cell::new("ID"), Cell::new(record.id)]);
    println!("{}", table);
}

pub fn print_lane_table(lanes: &[LaneSummary]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Rank").add_attribute(Attribute::Bold),
        Cell::new("Lane").add_attribute(Attribute::Bold),
        Cell::new("Vehicles"),
        Cell::new("Congestion"),
        Cell::new("Priority").fg(Color::Cyan),
        Cell::new("Types"),
    ]);

    for i in 0..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (rank, lane) in lanes.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(lane.lane_number),
            Cell::new(lane.vehicle_count),
            Cell::new(lane.congestion_level.to_string().to_uppercase())
                .fg(congestion_color(lane.congestion_level)),
            Cell::new(lane.priority_score).add_attribute(Attribute::Bold),
            Cell::new(format_types(&lane.vehicle_types)),
        ]);
    }
    println!("\n🛣️  Lane Analysis");
    println!("{}", table);
}

pub fn print_vehicle_types(counts: &VehicleTypeCounts) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let types = VehicleType::all();
    table.add_row(
        types
            .iter()
            .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table.add_row(
        types
            .iter()
            .map(|t| {
                Cell::new(counts.get(t).copied().unwrap_or(0)).set_alignment(CellAlignment::Center)
            })
            .collect::<Vec<_>>(),
    );
    println!("\n🚗 Vehicle Classification");
    println!("{}", table);
}

pub fn print_metrics(metrics: &TrafficMetrics) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Avg / Lane"),
        Cell::new(format!("{:.1}", metrics.avg_vehicles_per_lane)),
    ]);
    table.add_row(vec![
        Cell::new("High").fg(Color::Red),
        Cell::new(metrics.congestion_counts.high),
    ]);
    table.add_row(vec![
        Cell::new("Medium").fg(Color::Yellow),
        Cell::new(metrics.congestion_counts.medium),
    ]);
    table.add_row(vec![
        Cell::new("Low").fg(Color::Green),
        Cell::new(metrics.congestion_counts.low),
    ]);
    let critical = if metrics.critical_lanes.is_empty() {
        "none".to_string()
    } else {
        metrics
            .critical_lanes
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    table.add_row(vec![Cell::new("Critical Lanes"), Cell::new(critical)]);
    println!("\n📊 Traffic Metrics");
    println!("{}", table);
}

pub fn print_analysis(record: &AnalysisRecord) {
    print_summary(record);
    print_vehicle_types(&record.result.vehicle_types);
    print_lane_table(&record.result.lane_data);
    print_metrics(&record.metrics());
}

pub fn print_history(records: &[&AnalysisRecord]) {
    if records.is_empty() {
        println!("\nNo analyses yet.");
        return;
    }

    let now = Utc::now();
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("When"),
        Cell::new("Input"),
        Cell::new("Vehicles"),
        Cell::new("Lanes"),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Recommendation"),
    ]);

    for r in records {
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(relative_age(r.created_at, now)),
            Cell::new(r.input_type),
            Cell::new(r.result.total_vehicles).set_alignment(CellAlignment::Right),
            Cell::new(r.result.lanes_detected).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", r.result.optimization_score))
                .set_alignment(CellAlignment::Right),
            Cell::new(r.result.recommendation),
        ]);
    }
    println!("\n📜 === HISTORY === 📜");
    println!("{}", table);
}
