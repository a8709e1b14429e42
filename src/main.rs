// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use twinview::app::{self, App, Flags};

fn main() -> iced::Result {
    env_logger::init();

    let mut args = pico_args::Arguments::from_env();
    let flags = Flags {
        directory: args.opt_value_from_str("--dir").unwrap(),
        files: args
            .finish()
            .into_iter()
            .filter_map(|s| s.into_string().ok())
            .map(PathBuf::from)
            .collect(),
    };

    iced::application(move || App::new(flags.clone()), App::update, App::view)
        .title("TwinView")
        .subscription(App::subscription)
        .window(app::window_settings())
        .run()
}
