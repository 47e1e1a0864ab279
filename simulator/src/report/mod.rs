pub mod leaderboard;
pub mod model;
