use argh::FromArgs;
use datatype_query_api::ToolMode;
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Identify a file's datatype and list or launch its tools
pub struct Args {
    /// file to examine
    #[argh(positional)]
    pub file: PathBuf,

    /// launch the EDIT tool
    #[argh(switch)]
    pub edit: bool,

    /// launch the VIEW tool
    #[argh(switch)]
    pub view: bool,

    /// launch the INFO tool
    #[argh(switch)]
    pub info: bool,

    /// launch the PRINT tool
    #[argh(switch)]
    pub print: bool,

    /// launch the MAIL tool
    #[argh(switch)]
    pub mail: bool,

    /// directory holding the datatype descriptor files
    #[argh(option)]
    pub descriptors: Option<PathBuf>,

    /// config file to read instead of the default one
    #[argh(option)]
    pub config: Option<PathBuf>,

    /// show debug output on stderr
    #[argh(switch, short = 'v')]
    pub verbose: bool,
}

impl Args {
    /// The mode to launch. When several switches are given, the first of
    /// edit, view, info, print, mail wins.
    pub fn requested_mode(&self) -> Option<ToolMode> {
        [
            (self.edit, ToolMode::Edit),
            (self.view, ToolMode::Browse),
            (self.info, ToolMode::Info),
            (self.print, ToolMode::Print),
            (self.mail, ToolMode::Mail),
        ]
        .into_iter()
        .find_map(|(set, mode)| set.then_some(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["datatype"], args).unwrap()
    }

    #[rstest]
    #[case::none(&["pic.iff"], None)]
    #[case::edit(&["pic.iff", "--edit"], Some(ToolMode::Edit))]
    #[case::view(&["pic.iff", "--view"], Some(ToolMode::Browse))]
    #[case::info(&["pic.iff", "--info"], Some(ToolMode::Info))]
    #[case::print(&["pic.iff", "--print"], Some(ToolMode::Print))]
    #[case::mail(&["pic.iff", "--mail"], Some(ToolMode::Mail))]
    #[case::edit_beats_view(&["pic.iff", "--view", "--edit"], Some(ToolMode::Edit))]
    #[case::view_beats_info(&["pic.iff", "--mail", "--info", "--view"], Some(ToolMode::Browse))]
    #[case::print_beats_mail(&["pic.iff", "--mail", "--print"], Some(ToolMode::Print))]
    fn mode_selection(#[case] args: &[&str], #[case] expected: Option<ToolMode>) {
        assert_eq!(parse(args).requested_mode(), expected);
    }

    #[test]
    fn parses_paths() {
        let args = parse(&["pic.iff", "--descriptors", "/dt", "--config", "c.toml", "-v"]);
        assert_eq!(args.file, PathBuf::from("pic.iff"));
        assert_eq!(args.descriptors, Some(PathBuf::from("/dt")));
        assert_eq!(args.config, Some(PathBuf::from("c.toml")));
        assert!(args.verbose);
    }

    #[test]
    fn file_is_required() {
        assert!(Args::from_args(&["datatype"], &["--edit"]).is_err());
    }
}
