//! JavaScript entry point.
//!
//! Accepts the network tables and run options as plain JS objects and
//! returns the serialized [`Dimensioning`].

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::ga::GaConfig;
use crate::network::{AllocationProblem, Crossover, Dimensioning, Mutation, NetworkBuilder, Objective};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunOptions {
    config: GaConfig,
    objective: Objective,
    crossover: Crossover,
    mutation: Mutation,
}

/// Optimizes a flow allocation.
///
/// `network` has the shape of [`NetworkBuilder`]
/// (`{ module_capacity, links, demands, paths }`). `options` may be
/// `undefined`; missing fields take their defaults.
#[wasm_bindgen(js_name = optimizeAllocation)]
pub fn optimize_allocation(network: JsValue, options: JsValue) -> Result<JsValue, JsError> {
    let builder: NetworkBuilder = serde_wasm_bindgen::from_value(network)?;
    let options: RunOptions = if options.is_undefined() || options.is_null() {
        RunOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };

    let network = builder.build()?;
    let result: Dimensioning = AllocationProblem::new(&network, options.objective)
        .with_crossover(options.crossover)
        .with_mutation(options.mutation)
        .solve(&options.config)?;

    Ok(serde_wasm_bindgen::to_value(&result)?)
}
