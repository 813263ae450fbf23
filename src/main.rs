//! exprgen - lower a row-expression program to lix statements

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use exprgen::lix::{BlockBuilder, Expression};
use exprgen::program_file::{load_program, ProgramFormat};
use exprgen::translate::{
    translate_condition_with, translate_projects_with, ArrayRowPhysType, InlinePolicy,
    InputGetterImpl, TranslatorConfig,
};
use exprgen::types::{DefaultTypeAdapter, HostType};
use std::path::PathBuf;

/// exprgen - generate code for the projections and condition of a program
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Program file (.json or .bin)
    program: PathBuf,

    /// Program file format; guessed from the extension if omitted
    #[arg(short, long, value_enum)]
    format: Option<ProgramFormat>,

    /// Bind every expression to a variable instead of only shared ones
    #[arg(short, long)]
    materialize_all: bool,

    /// Prefix of generated variable names
    #[arg(short, long, default_value = "v")]
    prefix: String,

    /// Lower logic and comparisons to native operators
    #[arg(short, long)]
    native: bool,

    /// Translate the condition only
    #[arg(short, long)]
    condition_only: bool,

    /// Name of the input row variable
    #[arg(short, long, default_value = "row")]
    row: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let program = load_program(&args.program, args.format)
        .with_context(|| format!("Failed to load {}", args.program.display()))?;
    log::debug!("program:\n{}", program);

    let config = TranslatorConfig {
        inline_policy: if args.materialize_all {
            InlinePolicy::MaterializeAll
        } else {
            InlinePolicy::UsageCount
        },
        variable_prefix: args.prefix.clone(),
        native_operators: args.native,
    };
    let type_adapter = DefaultTypeAdapter::new();
    let input_getter = InputGetterImpl::single(
        Expression::parameter(args.row.as_str(), HostType::object_array()),
        ArrayRowPhysType::of(program.input_row_type(), &type_adapter),
    );
    let mut block = BlockBuilder::new();

    let mut outputs = Vec::new();
    if !args.condition_only {
        let projects =
            translate_projects_with(&program, &type_adapter, &mut block, &input_getter, &config)
                .context("Failed to translate projections")?;
        for (i, expr) in projects.into_iter().enumerate() {
            outputs.push((format!("project {}", i), expr));
        }
    }
    let condition =
        translate_condition_with(&program, &type_adapter, &mut block, &input_getter, &config)
            .context("Failed to translate condition")?;
    outputs.push(("condition".to_string(), condition));

    print!("{}", block);
    if !block.is_empty() {
        println!();
    }
    for (name, expr) in outputs {
        println!("{}: {}", name, expr);
    }

    Ok(())
}
