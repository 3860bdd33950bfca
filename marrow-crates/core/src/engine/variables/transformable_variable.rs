/// Creates views of a variable: [`TransformableVariable::scaled`] multiplies its domain by a
/// constant and [`TransformableVariable::offset`] shifts it.
pub trait TransformableVariable<View> {
    /// A variable whose domain is the domain of `self` multiplied by `scale`.
    ///
    /// The scaled domain has holes: if `dom(x) = {1, 2}`, then `dom(x.scaled(2)) = {2, 4}`.
    ///
    /// # Panics
    /// If `scale` is zero.
    fn scaled(&self, scale: i32) -> View;

    /// A variable whose domain is the domain of `self` shifted by `offset`.
    fn offset(&self, offset: i32) -> View;
}
