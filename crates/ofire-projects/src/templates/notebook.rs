//! Example Jupyter notebook generation

use crate::error::Result;
use serde_json::{json, Value};

/// File name of the example notebook
pub const NOTEBOOK_FILE: &str = "example_calculations.ipynb";

const CALCULATION_MODULES: &[(&str, &str)] = &[
    ("br_187", "BR 187 calculations"),
    ("bs9999", "BS 9999 calculations"),
    ("cibse_guide_e", "CIBSE Guide E calculations"),
    ("fire_dynamics_tools", "General fire dynamics tools"),
    ("pd_7974", "PD 7974 calculations"),
    ("sfpe_handbook", "SFPE Handbook calculations"),
    ("tr_17", "TR 17 calculations"),
    ("introduction_to_fire_dynamics", "Introductory calculations"),
];

/// Notebook source lines keep their trailing newline except the last
fn source(lines: &[&str]) -> Value {
    let last = lines.len().saturating_sub(1);
    let lines: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == last {
                line.to_string()
            } else {
                format!("{}\n", line)
            }
        })
        .collect();
    json!(lines)
}

fn markdown_cell(lines: &[&str]) -> Value {
    json!({
        "cell_type": "markdown",
        "metadata": {},
        "source": source(lines),
    })
}

fn code_cell(lines: &[&str]) -> Value {
    json!({
        "cell_type": "code",
        "execution_count": null,
        "metadata": {},
        "outputs": [],
        "source": source(lines),
    })
}

/// nbformat 4 notebook demonstrating the calculation library
pub fn example_notebook(project_name: &str) -> Value {
    let title = format!("# {} - Fire Engineering Calculations", project_name);

    let module_lines: Vec<String> = CALCULATION_MODULES
        .iter()
        .map(|(module, label)| format!("- `ofire.{}`: {}", module, label))
        .collect();
    let mut modules = vec![
        "## Available Modules",
        "",
        "The OpenFire library provides the following calculation modules:",
        "",
    ];
    modules.extend(module_lines.iter().map(String::as_str));

    json!({
        "cells": [
            markdown_cell(&[
                title.as_str(),
                "",
                "This notebook demonstrates basic usage of the OpenFire library for fire engineering calculations.",
            ]),
            code_cell(&[
                "import ofire",
                "import numpy as np",
                "import pandas as pd",
                "import matplotlib.pyplot as plt",
                "",
                "print('OpenFire library loaded successfully!')",
            ]),
            markdown_cell(&modules),
            markdown_cell(&[
                "## Example Calculation",
                "",
                "Add your fire engineering calculations in the cells below.",
            ]),
            code_cell(&[
                "# Example: Uncomment and run a calculation",
                "# room_area = 50.0  # m²",
                "# room_height = 3.0  # m",
                "# hrr = ofire.cibse_guide_e.chapter_6.equation_6_7.heat_release_rate_flashover(room_area, room_height)",
                "# print(f'Heat Release Rate at Flashover: {hrr:.1f} kW')",
            ]),
        ],
        "metadata": {
            "kernelspec": {
                "display_name": "Python 3",
                "language": "python",
                "name": "python3"
            },
            "language_info": {
                "name": "python",
                "version": "3.8.0"
            }
        },
        "nbformat": 4,
        "nbformat_minor": 4
    })
}

/// Pretty-printed notebook JSON
pub fn render_notebook(project_name: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&example_notebook(project_name))?)
}
