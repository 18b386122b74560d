use citygov::api::{BatchEntry, BatchSummary};
use citygov::city::City;
use citygov::governor::{Optimization, SearchStats};
use citygov::parameter::Parameter;
use citygov::presets::KnownPreset;
use citygov::types::{Allocation, Specialist, Stat};
use citygov::verifier::VerificationReport;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

fn right_align(table: &mut Table, cols: std::ops::RangeInclusive<usize>) {
    for i in cols {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// Map of the city around its centre. Worked tiles are marked with `*`.
pub fn print_city_grid(city: &City, worked: Option<&Allocation>) {
    println!("\nCity: {} (#{}, size {})", city.name, city.id, city.size);

    let xs = city.tiles.iter().map(|t| t.x).chain([0]);
    let ys = city.tiles.iter().map(|t| t.y).chain([0]);
    let (min_x, max_x) = xs.fold((0i8, 0i8), |(lo, hi), x| (lo.min(x), hi.max(x)));
    let (min_y, max_y) = ys.fold((0i8, 0i8), |(lo, hi), y| (lo.min(y), hi.max(y)));

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    for y in min_y..=max_y {
        let cells: Vec<Cell> = (min_x..=max_x)
            .map(|x| {
                if x == 0 && y == 0 {
                    let c = city.center;
                    return Cell::new(format!("[{}/{}/{}]", c.food, c.shield, c.trade))
                        .add_attribute(Attribute::Bold)
                        .set_alignment(CellAlignment::Center);
                }
                match city.tiles.iter().position(|t| t.x == x && t.y == y) {
                    Some(idx) => {
                        let o = city.tiles[idx].output;
                        let text = format!("{}/{}/{}", o.food, o.shield, o.trade);
                        if worked.is_some_and(|a| a.worked.contains(idx)) {
                            Cell::new(format!("*{}", text))
                                .fg(Color::Green)
                                .set_alignment(CellAlignment::Center)
                        } else {
                            Cell::new(text).set_alignment(CellAlignment::Center)
                        }
                    }
                    None => Cell::new(" "),
                }
            })
            .collect();
        table.add_row(cells);
    }
    println!("{}", table);
}

pub fn print_allocation(city: &City, result: &Optimization) {
    let Some(alloc) = &result.allocation else {
        println!("\n⛔ No allocation satisfies the objective for {}.", city.name);
        return;
    };

    print_city_grid(city, Some(alloc));

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Stat").add_attribute(Attribute::Bold),
        Cell::new("Production"),
        Cell::new("Surplus").fg(Color::Cyan),
    ]);
    right_align(&mut table, 1..=2);

    for stat in Stat::ALL {
        let surplus = alloc.surplus[stat];
        let surplus_cell = if surplus < 0 {
            Cell::new(surplus).fg(Color::Red)
        } else {
            Cell::new(surplus).fg(Color::Cyan)
        };
        table.add_row(vec![
            Cell::new(stat).add_attribute(Attribute::Bold),
            Cell::new(alloc.production[stat]),
            surplus_cell,
        ]);
    }
    println!("\n{}", table);

    let mut citizens = Table::new();
    citizens.load_preset(ASCII_FULL);
    citizens.add_row(vec![
        Cell::new("Workers").add_attribute(Attribute::Bold),
        Cell::new(Specialist::Entertainer),
        Cell::new(Specialist::Taxman),
        Cell::new(Specialist::Scientist),
        Cell::new("Mood"),
    ]);
    let mood = if alloc.happy {
        Cell::new("celebrating").fg(Color::Green)
    } else if alloc.disorder {
        Cell::new("disorder").fg(Color::Red)
    } else {
        Cell::new("content")
    };
    citizens.add_row(vec![
        Cell::new(alloc.workers()),
        Cell::new(alloc.specialists.entertainers),
        Cell::new(alloc.specialists.taxmen),
        Cell::new(alloc.specialists.scientists),
        mood,
    ]);
    println!("{}", citizens);

    if let Some(fit) = result.fitness {
        println!("Fitness: major {} / minor {}", fit.major, fit.minor);
    }
}

pub fn print_search_stats(stats: &SearchStats) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Oracle").fg(Color::Yellow),
        Cell::new("Tier1 Hits"),
        Cell::new("Tier2 Rebuilt"),
        Cell::new("Combos"),
        Cell::new("Visited"),
        Cell::new("Pruned"),
        Cell::new("Realizations"),
    ]);
    table.add_row(vec![
        Cell::new(stats.oracle_calls).fg(Color::Yellow),
        Cell::new(stats.tier1_hits),
        Cell::new(stats.tier2_reconstructions),
        Cell::new(stats.combinations_cached),
        Cell::new(stats.combinations_visited),
        Cell::new(stats.combinations_pruned),
        Cell::new(stats.realizations_evaluated),
    ]);
    right_align(&mut table, 0..=6);
    println!("\n{}", table);
}

pub fn print_verification(report: &VerificationReport) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Search").add_attribute(Attribute::Bold),
        Cell::new("Fitness"),
        Cell::new("Oracle Calls"),
    ]);
    right_align(&mut table, 1..=2);

    let fmt_fit = |f: Option<citygov::governor::Fitness>| match f {
        Some(f) => format!("{} / {}", f.major, f.minor),
        None => "infeasible".to_string(),
    };

    table.add_row(vec![
        Cell::new("Cached"),
        Cell::new(fmt_fit(report.cached.fitness)),
        Cell::new(report.cached.stats.oracle_calls),
    ]);
    table.add_row(vec![
        Cell::new("Exhaustive"),
        Cell::new(fmt_fit(report.exhaustive_fitness)),
        Cell::new(report.exhaustive_stats.oracle_calls),
    ]);
    println!("\n{}", table);

    if report.matches() {
        println!("✅ Cached search matches brute force.");
    } else if report.monotone {
        println!("❌ MISMATCH between cached search and brute force.");
    } else {
        println!("⚠️  Mismatch on a non-monotone objective.");
    }
}

pub fn print_batch_report(entries: &[BatchEntry], summary: &BatchSummary) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("City").add_attribute(Attribute::Bold),
        Cell::new("Size"),
        Cell::new("Workers"),
        Cell::new("Food"),
        Cell::new("Shield"),
        Cell::new("Trade"),
        Cell::new("Fitness").fg(Color::Cyan),
        Cell::new("Oracle"),
    ]);
    right_align(&mut table, 1..=7);

    for entry in entries {
        let name = if entry.name.is_empty() {
            format!("#{}", entry.city)
        } else {
            entry.name.clone()
        };

        let row = match (&entry.optimization, &entry.error) {
            (Some(o), _) => match (&o.allocation, o.fitness) {
                (Some(a), Some(f)) => vec![
                    Cell::new(name).add_attribute(Attribute::Bold),
                    Cell::new(entry.size),
                    Cell::new(a.workers()),
                    Cell::new(a.surplus[Stat::Food]),
                    Cell::new(a.surplus[Stat::Shield]),
                    Cell::new(a.surplus[Stat::Trade]),
                    Cell::new(f.major).fg(Color::Cyan),
                    Cell::new(o.stats.oracle_calls),
                ],
                _ => vec![
                    Cell::new(name).add_attribute(Attribute::Bold),
                    Cell::new(entry.size),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("infeasible").fg(Color::Yellow),
                    Cell::new(o.stats.oracle_calls),
                ],
            },
            (None, err) => vec![
                Cell::new(name).add_attribute(Attribute::Bold),
                Cell::new(entry.size),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new(err.as_deref().unwrap_or("error")).fg(Color::Red),
                Cell::new("-"),
            ],
        };
        table.add_row(row);
    }
    println!("\n{}", table);

    println!(
        "Cities: {} | Governed: {} | Infeasible: {} | Failed: {} | Oracle calls: {}",
        summary.cities, summary.governed, summary.infeasible, summary.failed, summary.oracle_calls
    );
}

pub fn print_parameter(name: &str, param: &Parameter) {
    println!("\nParameter: {}", name);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    table.add_row(vec![
        Cell::new("Stat").add_attribute(Attribute::Bold),
        Cell::new("Minimal"),
        Cell::new("Factor"),
    ]);
    right_align(&mut table, 1..=2);

    for stat in Stat::ALL {
        table.add_row(vec![
            Cell::new(stat).add_attribute(Attribute::Bold),
            Cell::new(param.minimal(stat)),
            Cell::new(param.factor_for(stat)),
        ]);
    }
    println!("{}", table);
    println!(
        "Happy factor: {} | Target: {} | Require happy: {}",
        param.happy_factor, param.factor_target, param.require_happy
    );
}

pub fn print_presets(presets: &[(KnownPreset, Parameter)]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Preset").add_attribute(Attribute::Bold),
        Cell::new("Minimal"),
        Cell::new("Factors"),
        Cell::new("Happy"),
        Cell::new("Description"),
    ]);

    let join = |vals: &[i16]| {
        vals.iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    };

    for (preset, param) in presets {
        let happy = if param.require_happy {
            format!("{} (required)", param.happy_factor)
        } else {
            param.happy_factor.to_string()
        };
        table.add_row(vec![
            Cell::new(preset).add_attribute(Attribute::Bold),
            Cell::new(join(&param.minimal_surplus)),
            Cell::new(join(&param.factor)),
            Cell::new(happy),
            Cell::new(preset.describe()),
        ]);
    }
    println!("\n{}", table);
}
