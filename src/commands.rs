use crate::{emit_success, InspectArgs, OutputMode, QueryArgs};
use neodb::approach::ApproachRow;
use neodb::config::{write_config, NeodbConfig};
use neodb::ui::{self, approach_table, header, info, neo_line, section, stats_table, success, summary_row, warn, Icons};
use neodb::write::write_results;
use neodb::{create_filters, limit, FilterCriteria, LinkReport, NeoDatabase};
use std::path::Path;

/// Results shown in the terminal when neither the flag nor the config sets a limit
const DEFAULT_TERMINAL_LIMIT: usize = 10;

pub const NOT_FOUND: &str = "No matching NEOs exist in the database.";

pub fn run_init(path: &Path, force: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let config = NeodbConfig::starter();
    write_config(path, &config, force)?;

    if output_mode.is_human() {
        success(&format!("Wrote {}", path.display()));
        info("NEO file", &config.resolve_neofile(None).display().to_string());
        info("Close-approach file", &config.resolve_cadfile(None).display().to_string());
    } else {
        let data = serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        });
        emit_success(output_mode, "init", data)?;
    }
    Ok(())
}

pub fn run_inspect(db: &NeoDatabase, args: &InspectArgs, output_mode: OutputMode) -> anyhow::Result<()> {
    let neo = match (&args.pdes, &args.name) {
        (Some(pdes), _) => db.get_by_designation(pdes),
        (None, name) => db.get_by_name_opt(name.as_deref()),
    };

    if !output_mode.is_human() {
        let data = match neo {
            Some(neo) => {
                let approaches: Vec<ApproachRow> = if args.verbose {
                    db.approaches_of(neo).map(|v| v.serialize()).collect()
                } else {
                    Vec::new()
                };
                serde_json::json!({
                    "neo": neo.serialize(),
                    "approaches": approaches,
                })
            }
            None => serde_json::Value::Null,
        };
        return emit_success(output_mode, "inspect", data);
    }

    let Some(neo) = neo else {
        println!("{}", NOT_FOUND);
        return Ok(());
    };

    neo_line(neo);
    if args.verbose {
        for view in db.approaches_of(neo) {
            println!("  - {}", view);
        }
    }
    Ok(())
}

pub fn run_query(
    db: &NeoDatabase,
    args: &QueryArgs,
    config: &NeodbConfig,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let criteria = criteria_from_args(args);
    let filters = create_filters(&criteria)?;
    let n = resolve_limit(args.limit, config.limit, args.outfile.is_some());
    tracing::debug!("Running query with {} filters, limit {:?}", filters.len(), n);

    if let Some(ref outfile) = args.outfile {
        let written = write_results(limit(db.query(&filters), n), outfile)?;
        if output_mode.is_human() {
            success(&format!("Wrote {} close approaches to {}", written, outfile.display()));
        } else {
            let data = serde_json::json!({
                "outfile": outfile.display().to_string(),
                "written": written,
            });
            emit_success(output_mode, "query", data)?;
        }
        return Ok(());
    }

    let results: Vec<_> = limit(db.query(&filters), n).collect();

    if !output_mode.is_human() {
        let rows: Vec<ApproachRow> = results.iter().map(|v| v.serialize()).collect();
        return emit_success(output_mode, "query", serde_json::to_value(rows)?);
    }

    header("Close approaches");
    if filters.is_empty() {
        summary_row("Filters:", "none");
    } else {
        for filter in &filters {
            summary_row("Filter:", filter.description());
        }
    }

    if results.is_empty() {
        println!();
        println!("{} No matching close approaches.", Icons::SEARCH);
        return Ok(());
    }

    println!("{}", approach_table(results.iter().copied()));
    println!("{}", ui::dim(&format!("{} shown", results.len())));
    Ok(())
}

pub fn run_stats(db: &NeoDatabase, report: &LinkReport, output_mode: OutputMode) -> anyhow::Result<()> {
    if !output_mode.is_human() {
        let mut data = serde_json::to_value(report)?;
        data["named"] = serde_json::json!(db.named_count());
        return emit_success(output_mode, "stats", data);
    }

    let neos = db.neo_count().to_string();
    let named = db.named_count().to_string();
    let approaches = db.approach_count().to_string();
    let linked = report.linked.to_string();
    let dangling = report.dangling.len().to_string();
    let duplicates = report.duplicate_designations.len().to_string();

    section(&format!("{} Link Stats", Icons::STATS));
    println!(
        "{}",
        stats_table(&[
            ("NEOs", &neos),
            ("Named NEOs", &named),
            ("Close approaches", &approaches),
            ("Linked", &linked),
            ("Dangling", &dangling),
            ("Duplicate designations", &duplicates),
        ])
    );

    if !report.duplicate_designations.is_empty() {
        summary_row("Duplicates:", &report.duplicate_designations.join(", "));
    }
    if !report.dangling.is_empty() {
        warn(&format!(
            "{} close approaches refer to designations missing from the NEO file",
            report.dangling.len()
        ));
    }
    Ok(())
}

fn criteria_from_args(args: &QueryArgs) -> FilterCriteria {
    let hazardous = match (args.hazardous, args.not_hazardous) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    };

    FilterCriteria {
        date: args.date,
        start_date: args.start_date,
        end_date: args.end_date,
        distance_min: args.min_distance,
        distance_max: args.max_distance,
        velocity_min: args.min_velocity,
        velocity_max: args.max_velocity,
        diameter_min: args.min_diameter,
        diameter_max: args.max_diameter,
        hazardous,
        designation: args.designation.clone(),
        name: args.name.clone(),
    }
}

/// Flag, then config, then 10 for the terminal or everything for a file
fn resolve_limit(flag: Option<usize>, config: Option<usize>, to_file: bool) -> Option<usize> {
    flag.or(config)
        .or(if to_file { None } else { Some(DEFAULT_TERMINAL_LIMIT) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn empty_args() -> QueryArgs {
        QueryArgs {
            date: None,
            start_date: None,
            end_date: None,
            min_distance: None,
            max_distance: None,
            min_velocity: None,
            max_velocity: None,
            min_diameter: None,
            max_diameter: None,
            hazardous: false,
            not_hazardous: false,
            designation: None,
            name: None,
            limit: None,
            outfile: None,
        }
    }

    #[test]
    fn test_resolve_limit() {
        assert_eq!(resolve_limit(Some(3), Some(5), false), Some(3));
        assert_eq!(resolve_limit(None, Some(5), true), Some(5));
        assert_eq!(resolve_limit(None, None, false), Some(10));
        assert_eq!(resolve_limit(None, None, true), None);
        assert_eq!(resolve_limit(Some(0), None, false), Some(0));
    }

    #[test]
    fn test_criteria_from_args() {
        assert!(criteria_from_args(&empty_args()).is_empty());

        let args = QueryArgs {
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            max_distance: Some(0.05),
            not_hazardous: true,
            name: Some("eros".to_string()),
            ..empty_args()
        };
        let criteria = criteria_from_args(&args);

        assert_eq!(criteria.start_date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(criteria.distance_max, Some(0.05));
        assert_eq!(criteria.hazardous, Some(false));
        assert_eq!(criteria.name.as_deref(), Some("eros"));
    }
}
