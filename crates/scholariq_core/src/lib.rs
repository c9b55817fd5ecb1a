pub mod age;
pub mod citations;
pub mod domain;
pub mod error;
pub mod heuristics;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod validate;
