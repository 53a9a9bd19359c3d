// ========== USER ==========
pub use weekdo_atoms::users::model::{User, UserRecord, UserSummary};

// ========== TASK ==========
pub use weekdo_atoms::tasks::model::{CreateTaskPayload, Priority, Task, UpdateTaskPayload};

// ========== CATEGORY ==========
pub use weekdo_atoms::categories::model::{Category, CreateCategoryPayload};

// ========== GOAL ==========
pub use weekdo_atoms::goals::model::{CreateGoalPayload, Goal, UpdateGoalPayload};

// ========== REPORTS ==========
pub use reports_block::types::{
    Analytics, DailyActivity, Overview, PriorityBreakdown, RecentActivity,
};
