use dotenvy::dotenv;
use slides_layout::api::{find_and_replace, reposition_element};
use slides_layout::layout::{ElementRequest, Replacement};
use slides_layout::models::{BoundingBox, PositionUpdate};
use slides_layout::{
    add_elements, get_slide_elements, AddElementsRequest, LayoutConfig, LayoutEngine, Presentation,
};

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = LayoutConfig::from_env();
    let mut presentation = Presentation::new("granular-demo", config.canvas);
    presentation.add_slide();
    let engine = LayoutEngine::new(config);

    let chart_area = BoundingBox::new(7.0, 1.5, 5.5, 4.0);
    let elements = vec![
        ElementRequest {
            content: "# Pipeline review".to_string(),
            ..Default::default()
        },
        ElementRequest {
            content: "![Pipeline by stage](charts/pipeline.png)".to_string(),
            position: Some(chart_area),
            ..Default::default()
        },
        // lands on the chart and is skipped
        ElementRequest {
            content: "- Owner: [Owner Name]\n- Close date: [Date]".to_string(),
            position: Some(BoundingBox::new(8.0, 2.0, 4.0, 1.5)),
            auto_position: Some(false),
        },
        // same box, but allowed to move
        ElementRequest {
            content: "- Owner: [Owner Name]\n- Close date: [Date]".to_string(),
            position: Some(BoundingBox::new(8.0, 2.0, 4.0, 1.5)),
            auto_position: Some(true),
        },
    ];

    let response = add_elements(
        &engine,
        &mut presentation,
        &AddElementsRequest {
            slide_index: 0,
            elements: Some(elements),
            ..Default::default()
        },
    )?;
    for added in &response.elements_added {
        log::info!(
            "#{} {} as {} at {} (adjusted: {})",
            added.index,
            added.element_id,
            added.element_type,
            added.final_position.describe(),
            added.position_adjusted
        );
    }
    for skipped in &response.elements_skipped {
        log::warn!("#{} skipped: {} ({})", skipped.index, skipped.skip_reason, skipped.suggestion);
    }

    let moved = reposition_element(
        &mut presentation,
        0,
        0,
        &PositionUpdate {
            top: Some(0.3),
            ..Default::default()
        },
    )?;
    log::info!("Reposition: {:?}", moved.changes_made);

    let replaced = find_and_replace(
        &engine,
        &mut presentation,
        &[
            Replacement {
                find: "[Owner Name]".to_string(),
                replace: "**Dana Reyes**".to_string(),
            },
            Replacement {
                find: "[Date]".to_string(),
                replace: "30 Sep".to_string(),
            },
        ],
    )?;
    log::info!("Replacements: {:?}", replaced.replacements);

    let report = get_slide_elements(&presentation, 0, true)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
