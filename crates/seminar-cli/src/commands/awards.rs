//! The `seminar awards` command.

use std::path::Path;

use anyhow::Result;

use seminar_core::model::AwardCategory;
use seminar_report::text::{award_details, ranking_lines};

use super::Seminar;

pub fn execute(
    data: Option<&Path>,
    config: Option<&Path>,
    categories: Vec<AwardCategory>,
    record: bool,
    rank: bool,
) -> Result<()> {
    let categories = if categories.is_empty() {
        AwardCategory::ALL.to_vec()
    } else {
        categories
    };

    let seminar = Seminar::open(data, config)?;
    let awards = if record {
        seminar.repo.record_awards(&categories)?
    } else {
        seminar.repo.compute_awards(&categories)
    };

    seminar.repo.with_graph(|graph| {
        for award in &awards {
            println!("{}\n", award_details(graph, award));
        }
    });

    if rank {
        for &category in &categories {
            let ranking = seminar.repo.rank(category);
            let text = seminar
                .repo
                .with_graph(|graph| ranking_lines(graph, category, &ranking));
            print!("{text}");
        }
    }

    if record {
        eprintln!("Recorded {} award(s).", awards.len());
    }
    Ok(())
}
