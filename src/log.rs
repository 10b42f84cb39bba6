pub mod targets {
    pub const RESOLVE: &str = "resolve";
    pub const FAMILY: &str = "family";
    pub const FOLD: &str = "fold";
    pub const CALCULATOR: &str = "calculator";
    pub const BAKE: &str = "bake";
    pub const CONFIG: &str = "config";
}
