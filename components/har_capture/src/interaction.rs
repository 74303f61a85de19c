//! Post-load reading simulation
//!
//! Once a page is complete the session scrolls part of it the way a reader
//! would: wheel increments of random size and pacing from a random point of
//! the viewport, toward a random depth of the page, then a short pause.
//! Lazy-loaded content triggered by the scroll is not part of the document.

use crate::config::InteractionConfig;
use crate::context::BrowsingContext;
use crate::error::{CaptureError, Result};
use cdp_types::domains::runtime::EvaluateResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const MEASURE_EXPRESSION: &str = "({\
    height: document.documentElement.scrollHeight, \
    width: window.innerWidth, \
    viewport: window.innerHeight, \
    scrollY: window.scrollY})";

const SCROLL_Y_EXPRESSION: &str = "window.scrollY";

/// Page geometry in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageGeometry {
    pub height: f64,
    pub width: f64,
    pub viewport: f64,
    pub scroll_y: f64,
}

/// What the simulation did
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ReadingSummary {
    pub steps: u32,
    pub target: f64,
    pub reached: f64,
}

pub(crate) async fn simulate_reading(
    context: &dyn BrowsingContext,
    config: &InteractionConfig,
) -> Result<ReadingSummary> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let geometry: PageGeometry = evaluate(context, MEASURE_EXPRESSION).await?;
    let fraction = sample_f64(&mut rng, config.target_fraction);
    let scrollable = (geometry.height - geometry.viewport).max(0.0);
    let target = (geometry.height * fraction).min(scrollable);

    let x = sample_f64(&mut rng, (0.0, (geometry.width - 1.0).max(0.0))).round();
    let y = sample_f64(&mut rng, (0.0, (geometry.viewport - 1.0).max(0.0))).round();
    debug!(
        "Scrolling from ({}, {}) toward {:.0}px of {:.0}px",
        x, y, target, geometry.height
    );

    let mut reached = geometry.scroll_y;
    let mut steps = 0;
    while reached < target && steps < config.max_steps {
        let delta = sample_u64(&mut rng, (config.step_px.0.into(), config.step_px.1.into()));
        context
            .send_command(
                "Input.dispatchMouseEvent",
                json!({
                    "type": "mouseWheel",
                    "x": x,
                    "y": y,
                    "deltaX": 0,
                    "deltaY": delta,
                }),
            )
            .await?;
        steps += 1;

        pause(&mut rng, config.pace_ms).await;

        let position: f64 = evaluate(context, SCROLL_Y_EXPRESSION).await?;
        if position <= reached {
            debug!("Scroll stalled at {:.0}px after {} step(s)", position, steps);
            break;
        }
        reached = position;
    }

    pause(&mut rng, config.dwell_ms).await;

    Ok(ReadingSummary {
        steps,
        target,
        reached,
    })
}

async fn evaluate<T: DeserializeOwned>(context: &dyn BrowsingContext, expression: &str) -> Result<T> {
    let result = context
        .send_command(
            "Runtime.evaluate",
            json!({ "expression": expression, "returnByValue": true }),
        )
        .await?;
    let result: EvaluateResult = serde_json::from_value(result)
        .map_err(|e| CaptureError::Other(anyhow::anyhow!("Runtime.evaluate result: {}", e)))?;
    if let Some(exception) = result.exception_details {
        return Err(CaptureError::Other(anyhow::anyhow!(
            "Evaluation threw: {}",
            exception.text
        )));
    }
    let value = result.result.value.unwrap_or_default();
    serde_json::from_value(value)
        .map_err(|e| CaptureError::Other(anyhow::anyhow!("Unexpected evaluation value: {}", e)))
}

async fn pause(rng: &mut StdRng, range_ms: (u64, u64)) {
    let millis = sample_u64(rng, range_ms);
    if millis > 0 {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}

fn sample_u64(rng: &mut StdRng, (a, b): (u64, u64)) -> u64 {
    rng.gen_range(a.min(b)..=a.max(b))
}

fn sample_f64(rng: &mut StdRng, (a, b): (f64, f64)) -> f64 {
    rng.gen_range(a.min(b)..=a.max(b))
}
