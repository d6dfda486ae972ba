//! Front-end tests: command output with stub oracles, session files and log rotation.
