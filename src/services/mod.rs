pub mod seeder;

pub use seeder::run_seed;
