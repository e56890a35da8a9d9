use std::env;
use std::fs;

use anyhow::Context;
use dotenvy::dotenv;
use slides_layout::{
    add_elements, get_slide_elements, AddElementsRequest, LayoutConfig, LayoutEngine, Presentation,
};

const SAMPLE: &str = "# [Company Name, Bold, Color=#003366]\n\
                      \n\
                      ## Q3 Highlights\n\
                      \n\
                      - Revenue grew **12%** year over year\n\
                      - Two product launches: *Atlas* and *Nimbus*\n\
                      - Hiring plan on track\n\
                      \n\
                      | Region | Revenue | Growth |\n\
                      |--------|--------:|-------:|\n\
                      | EMEA   | $4.2M   | 8%     |\n\
                      | APAC   | $3.1M   | 15%    |\n\
                      \n\
                      > Focus on fewer, bigger bets.\n";

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // Usage: cargo run --example layout_markdown -- [markdown file]
    let markdown = match env::args().nth(1) {
        Some(path) => fs::read_to_string(&path).with_context(|| format!("reading {}", path))?,
        None => SAMPLE.to_string(),
    };

    let config = LayoutConfig::from_env();
    let mut presentation = Presentation::new("demo", config.canvas);
    presentation.add_slide();
    let engine = LayoutEngine::new(config);

    let response = add_elements(
        &engine,
        &mut presentation,
        &AddElementsRequest {
            slide_index: 0,
            markdown: Some(markdown),
            auto_layout: Some(true),
            ..Default::default()
        },
    )?;
    log::info!(
        "Created {} element(s): {:?}",
        response.elements_created,
        response.element_types
    );

    let report = get_slide_elements(&presentation, 0, true)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
