mod engine;
mod types;

pub use engine::{TemplateEngine, TemplateError};
pub use types::{
    single_line, CommitContext, ComparisonTemplateContext, DashboardRow,
    DashboardTemplateContext, RepositoryFrontmatter, RepositoryTemplateContext,
    SummaryFrontmatter, TemplateOptions, TemplateType,
};
