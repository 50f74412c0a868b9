/// Times a build phase and reports it at debug level when the `stats` feature is on.
macro_rules! timed {
    ($name:literal, $block:block) => {{
        #[cfg(feature = "stats")]
        let start = std::time::Instant::now();

        let result = $block;

        #[cfg(feature = "stats")]
        bevy::log::debug!("{} in {:?}", $name, start.elapsed());

        result
    }};
}

pub(crate) use timed;
