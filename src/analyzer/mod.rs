pub mod classifier;
pub mod criteria;
pub mod lexicon;
pub mod query;

pub use classifier::{classify, WordClass, WordClasses};
pub use criteria::{Criteria, MatchField, Position, WorkingSet};
pub use lexicon::Lexicon;
pub use query::parse_query;
