use crate::approach::ApproachView;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
pub struct ApproachTableRow {
    #[tabled(rename = "Time (UTC)")]
    pub time: String,
    #[tabled(rename = "NEO")]
    pub neo: String,
    #[tabled(rename = "Distance (au)")]
    pub distance: String,
    #[tabled(rename = "Velocity (km/s)")]
    pub velocity: String,
    #[tabled(rename = "Diameter (km)")]
    pub diameter: String,
    #[tabled(rename = "Hazardous")]
    pub hazardous: String,
}

impl From<&ApproachView<'_>> for ApproachTableRow {
    fn from(view: &ApproachView<'_>) -> Self {
        let neo = view.neo;
        Self {
            time: or_unknown(view.approach.time_str()),
            neo: neo
                .map(|n| n.fullname())
                .unwrap_or_else(|| format!("{} (unlinked)", view.designation())),
            distance: number(view.distance(), 4),
            velocity: number(view.velocity(), 2),
            diameter: neo.map(|n| number(n.diameter, 3)).unwrap_or_else(|| "-".to_string()),
            hazardous: match neo {
                Some(n) if n.hazardous => "yes".to_string(),
                Some(_) => "no".to_string(),
                None => "-".to_string(),
            },
        }
    }
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

/// Render query results; empty string when there are none
pub fn approach_table<'a>(views: impl IntoIterator<Item = ApproachView<'a>>) -> String {
    let rows: Vec<ApproachTableRow> = views.into_iter().map(|v| ApproachTableRow::from(&v)).collect();
    if rows.is_empty() {
        return String::new();
    }

    Table::new(&rows).with(Style::rounded()).to_string()
}

fn number(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "unknown".to_string()
    } else {
        format!("{:.*}", precision, value)
    }
}

fn or_unknown(text: String) -> String {
    if text.is_empty() { "unknown".to_string() } else { text }
}
