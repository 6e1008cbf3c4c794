pub mod game_repository_errors;
