//! Argument vectors for each external tool.
//!
//! Order is fixed per tool; some of these tools are order sensitive. Tokens
//! are raw values: the interpreter quotes them when the line is composed.
//! Blank values, in scalars and in lists alike, produce no token.

use std::path::Path;

use super::paths::{absolutize, path_arg};
use crate::exec::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsBuildTarget {
    Build,
    Clean,
}

impl MsBuildTarget {
    fn flag(&self) -> &'static str {
        match self {
            MsBuildTarget::Build => "/t:Build",
            MsBuildTarget::Clean => "/t:Clean",
        }
    }
}

/// `<project> /t:<target> [/p:Config=..] [/p:Platform=..]`
pub fn msbuild_args(
    project: &Path,
    target: MsBuildTarget,
    configuration: Option<&str>,
    platform: Option<&str>,
) -> Vec<String> {
    let mut args = vec![path_arg(project), target.flag().to_string()];
    if let Some(config) = present(configuration) {
        args.push(format!("/p:Config={config}"));
    }
    if let Some(platform) = present(platform) {
        args.push(format!("/p:Platform={platform}"));
    }
    args
}

/// Compiler options, everything except the source file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpcOptions<'a> {
    pub target_cpu: Option<&'a str>,
    pub target_os: Option<&'a str>,
    pub output_path: Option<&'a str>,
    pub defines: &'a [String],
    pub unit_search_paths: &'a [String],
    pub include_search_paths: &'a [String],
}

/// `-P -T -o -d* -Fu* -Fi* <source>`, with every path made absolute.
pub fn fpc_args(source: &Path, opts: FpcOptions<'_>) -> Result<Vec<String>> {
    let mut args = Vec::new();
    if let Some(cpu) = present(opts.target_cpu) {
        args.push(format!("-P{cpu}"));
    }
    if let Some(os) = present(opts.target_os) {
        args.push(format!("-T{os}"));
    }
    if let Some(output) = present(opts.output_path) {
        args.push(format!("-o{}", path_arg(&absolutize(output)?)));
    }
    for define in present_all(opts.defines) {
        args.push(format!("-d{define}"));
    }
    for dir in present_all(opts.unit_search_paths) {
        args.push(format!("-Fu{}", path_arg(&absolutize(dir)?)));
    }
    for dir in present_all(opts.include_search_paths) {
        args.push(format!("-Fi{}", path_arg(&absolutize(dir)?)));
    }
    args.push(path_arg(source));
    Ok(args)
}

/// `[--build-mode=..] [--cpu=..] [--os=..] <project>`
pub fn lazbuild_args(
    project: &Path,
    build_mode: Option<&str>,
    target_cpu: Option<&str>,
    target_os: Option<&str>,
) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(mode) = present(build_mode) {
        args.push(format!("--build-mode={mode}"));
    }
    if let Some(cpu) = present(target_cpu) {
        args.push(format!("--cpu={cpu}"));
    }
    if let Some(os) = present(target_os) {
        args.push(format!("--os={os}"));
    }
    args.push(path_arg(project));
    args
}

/// lazbuild has no clean target; a forced full rebuild discards stale units.
pub fn lazbuild_clean_args(project: &Path) -> Vec<String> {
    vec!["--build-all".to_string(), path_arg(project)]
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn present_all(values: &[String]) -> impl Iterator<Item = &str> {
    values.iter().filter_map(|v| present(Some(v.as_str())))
}
