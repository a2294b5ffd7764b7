//! Population report.

use super::{Field, FormattedText, Report};
use herald_core::{HeraldError, PopulationLevel, RegionPopulation, Trend, WorldId};
use std::collections::BTreeMap;

pub const POPULATION_TITLE: &str = "Population Update";

/// Placeholder for a main world without a linked world in that column.
pub const NO_LINK: &str = ":negative_squared_cross_mark:";

/// `"Next relink: YYYY-MM-DD"`.
pub fn format_relink(population: &RegionPopulation) -> FormattedText {
    let date = population
        .relink
        .map(|relink| relink.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let mut ft = FormattedText::new();
    ft.plain(format!("Next relink: {date}"));
    ft
}

/// Population emoji, trend arrow (if a previous level is known), name.
fn format_world(
    population: &RegionPopulation,
    world: WorldId,
    previous: &BTreeMap<WorldId, PopulationLevel>,
) -> Result<FormattedText, HeraldError> {
    let level = population
        .level(world)
        .ok_or(HeraldError::WorldInfoNotFound(world))?;
    let name = population
        .name(world)
        .ok_or(HeraldError::NameNotFound(world))?;

    let mut ft = FormattedText::new();
    ft.plain(level.emoji());
    if let Some(before) = previous.get(&world) {
        ft.plain(format!(" {}", Trend::between(level, *before).arrow()));
    }
    ft.plain(" ").underline_if(world == population.world, name);
    Ok(ft)
}

/// Main worlds by name in one field, their linked worlds in one or two
/// columns beside them.
pub fn population_report(
    population: &RegionPopulation,
    previous: &BTreeMap<WorldId, PopulationLevel>,
) -> Result<Report, HeraldError> {
    let mut mains = FormattedText::new();
    let mut first_links = FormattedText::new();
    let mut second_links = FormattedText::new();

    for (i, main) in population.mains_by_name().into_iter().enumerate() {
        if i > 0 {
            mains.plain("\n");
            first_links.plain("\n");
            second_links.plain("\n");
        }
        mains.append(format_world(population, main, previous)?);

        let linked = population.links.get(&main).map(Vec::as_slice).unwrap_or_default();
        match linked.first() {
            Some(world) => first_links.append(format_world(population, *world, previous)?),
            None => first_links.plain(NO_LINK),
        };
        match linked.get(1) {
            Some(world) => second_links.append(format_world(population, *world, previous)?),
            None => second_links.plain(NO_LINK),
        };
    }

    let mut fields = vec![Field {
        name: "Main Worlds".to_string(),
        value: mains,
    }];
    if population.has_double_links() {
        fields.push(Field {
            name: "Linked Worlds (1)".to_string(),
            value: first_links,
        });
        fields.push(Field {
            name: "Linked Worlds (2)".to_string(),
            value: second_links,
        });
    } else {
        fields.push(Field {
            name: "Linked Worlds".to_string(),
            value: first_links,
        });
    }

    Ok(Report {
        title: POPULATION_TITLE.to_string(),
        description: format_relink(population),
        fields,
        color: None,
    })
}
