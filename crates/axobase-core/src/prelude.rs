//! Axobase Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use axobase_core::prelude::*;
//! ```

pub use crate::chromosome::{Chromosome, ChromosomeId};
pub use crate::config::{
    BalanceThresholds, CacheConfig, CycleConfig, DecisionConfig, ExpressionConfig, MutationRates,
};
pub use crate::environment::{EnvironmentalState, OperationMode};
pub use crate::epigenome::{Epigenome, EpigeneticMark, Modification};
pub use crate::error::{AxobaseError, ExpressionWarning, Result};
pub use crate::gene::{ExpressionState, Gene, GeneDomain, GeneId, GeneOrigin};
pub use crate::genome::{DynamicGenome, GenomeMetadata, LineageId};
pub use crate::ports::{
    AgentId, AgentPorts, Balances, ChaChaEntropy, Clock, EntropySource, LanguageModel, Ledger,
    Messaging, PermanentStorage, SystemClock, ThinkOptions, Wallet,
};
pub use crate::regulatory::{
    RegulatoryEdge, RegulatoryLogic, RegulatoryRelation, DEFAULT_COOPERATIVITY, DEFAULT_THRESHOLD,
};
pub use crate::serialize::{GenomeRecord, RECORD_VERSION};
