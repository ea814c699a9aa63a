//    Copyright 2024 The Soroswap Development Community
//    SPDX-License-Identifier: BSD-3-Clause

use log::LevelFilter;

pub fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let colors = fern::colors::ColoredLevelConfig::new()
        .info(fern::colors::Color::Green)
        .debug(fern::colors::Color::Yellow)
        .error(fern::colors::Color::Red);
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(std::time::SystemTime::now()),
                record.metadata().target(),
                colors.color(record.level()),
                message
            ))
        })
        // skip hyper, reqwest and rustls chatter
        .filter(|record_metadata| record_metadata.target().starts_with("soroswap"))
        .level(level)
        // stdout carries command output
        .chain(std::io::stderr())
        .apply()
}
