//! Convenience re-exports for the common use cases

pub use crate::analytics::{
    DistributionBucket, DistributionMetric, HealthOverview, TrendMetric, TrendPeriod, TrendPoint,
    TrendSeries, UserHealthSummary,
};
pub use crate::chat::{
    CHAT_UNAVAILABLE_MESSAGE, ChatReply, ChatRequest, ChatSink, ChatStreamSession, SessionStep,
    SleepSchedule, StreamFrame, UserHealthData,
};
pub use crate::client::HealthHero;
pub use crate::error::{ErrorKind, HealthHeroRequestError};
pub use crate::records::{
    ExerciseLog, HealthRecord, NewExerciseLog, NewHealthRecord, NewSleepRecord, SleepRecord,
};
pub use crate::session::{MemorySession, SessionProvider};
pub use crate::users::{LoginRequest, LoginResponse, RegisterRequest, User};
