pub mod evidence_collector;
pub mod viability_analyst;

pub use evidence_collector::EvidenceCollector;
pub use viability_analyst::ViabilityAnalyst;
