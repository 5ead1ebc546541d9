/// This trait is used to score a position that is not finished but where the search has reached
/// its maximum depth
///
/// Any `Fn(&GameType) -> i64` is Scorable, so plain functions and closures can be used directly
pub trait Scorable<GameType> {
    /// Convert the given position into a score, higher is better for the maximizing side
    fn score(&self, game: &GameType) -> i64;
}

impl<GameType, FnLike: Fn(&GameType) -> i64> Scorable<GameType> for FnLike {
    fn score(&self, game: &GameType) -> i64 {
        (self)(game)
    }
}
