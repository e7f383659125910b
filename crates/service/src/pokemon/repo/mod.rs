pub mod seaorm;

pub use seaorm::{select_for, SeaOrmPokemonRepository};
