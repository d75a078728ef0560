use argh::FromArgs;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "purchases.txt";
pub const DEFAULT_OUTPUT: &str = "frequency.dat";
pub const DEFAULT_MODULE: &str = "grocer";

#[derive(FromArgs, Debug, Default, PartialEq)]
/// Track and chart the Corner Grocer's daily purchases.
///
/// Every option can also be set through the environment (GROCER_INPUT, GROCER_OUTPUT,
/// GROCER_MODULE, GROCER_MODULE_DIR). Command-line values win.
pub struct Args {
    #[argh(option, short = 'i')]
    /// file listing one purchased item per line. Defaults to purchases.txt.
    pub input: Option<String>,

    #[argh(option, short = 'o')]
    /// file the purchase histogram is written to. Defaults to frequency.dat.
    pub output: Option<String>,

    #[argh(option, short = 'm')]
    /// name of the Lua module with the analysis functions, without the .lua extension.
    pub module: Option<String>,

    #[argh(option, short = 'd')]
    /// directory the module is loaded from. Defaults to the working directory.
    pub module_dir: Option<PathBuf>,
}

/// Names of the four functions the scripting module must provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNames {
    /// `f(input)`: prints every item with its count.
    pub count_items: String,
    /// `f(input) -> {string}`: distinct item names in first-seen order.
    pub list_items: String,
    /// `f(input, item) -> integer`
    pub count_item: String,
    /// `f(input, output) -> integer`: prints and writes the histogram.
    pub chart_items: String,
}

impl Default for FunctionNames {
    fn default() -> Self {
        Self {
            count_items: "CountItems".to_string(),
            list_items: "GetItems".to_string(),
            count_item: "CountOneItem".to_string(),
            chart_items: "ChartItems".to_string(),
        }
    }
}

/// Everything the application needs to know before the menu starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: String,
    pub output: String,
    pub module: String,
    pub module_dir: PathBuf,
    pub functions: FunctionNames,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT.to_string(),
            output: DEFAULT_OUTPUT.to_string(),
            module: DEFAULT_MODULE.to_string(),
            module_dir: PathBuf::from("."),
            functions: FunctionNames::default(),
        }
    }
}

impl Config {
    /// Builds the configuration from command-line values, falling back to `var` for
    /// environment lookups and then to the defaults. Empty variables count as unset.
    pub fn resolve(args: Args, var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| var(key).filter(|value| !value.is_empty());
        let defaults = Self::default();
        Self {
            input: args.input.or_else(|| var("GROCER_INPUT")).unwrap_or(defaults.input),
            output: args
                .output
                .or_else(|| var("GROCER_OUTPUT"))
                .unwrap_or(defaults.output),
            module: args
                .module
                .or_else(|| var("GROCER_MODULE"))
                .unwrap_or(defaults.module),
            module_dir: args
                .module_dir
                .or_else(|| var("GROCER_MODULE_DIR").map(PathBuf::from))
                .unwrap_or(defaults.module_dir),
            functions: defaults.functions,
        }
    }

    /// Same as [`Config::resolve`] using the process environment.
    pub fn from_env(args: Args) -> Self {
        Self::resolve(args, |key| std::env::var(key).ok())
    }
}
