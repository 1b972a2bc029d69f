// EngineFacade: version query and log-level control on the engine handle
//
// Independent of the backend connection state.

use crate::engine::events::HostEventKind;
use crate::engine::media::VersionTriple;
use crate::engine::EngineHandles;
use crate::logging::LogLevel;

pub struct EngineFacade<'h> {
    handles: &'h EngineHandles,
}

impl<'h> EngineFacade<'h> {
    pub fn new(handles: &'h EngineHandles) -> Self {
        Self { handles }
    }

    /// Version of the linked engine. Pure read.
    pub fn version(&self) -> VersionTriple {
        self.handles.engine().version()
    }

    pub fn log_level(&self) -> LogLevel {
        self.handles.engine().log_level()
    }

    /// Change engine-wide logging verbosity for the rest of the process.
    pub fn set_logging(&self, level: LogLevel) {
        self.handles.engine().set_log_level(level);
        self.handles
            .events()
            .publish(HostEventKind::LogLevelChanged { level });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_stable() {
        let handles = EngineHandles::new_dummy_test();
        let first = handles.facade().version();
        for _ in 0..3 {
            assert_eq!(handles.facade().version(), first);
        }
    }

    #[test]
    fn test_version_independent_of_connection() {
        let handles = EngineHandles::new_dummy_test();
        let before = handles.facade().version();
        handles.connection().connect(None).unwrap();
        assert_eq!(handles.facade().version(), before);
    }

    #[test]
    fn test_set_logging_last_call_wins() {
        let handles = EngineHandles::new_dummy_test();
        let mut rx = handles.subscribe_events();

        handles.facade().set_logging(LogLevel::Error);
        handles.facade().set_logging(LogLevel::Quiet);

        assert_eq!(handles.facade().log_level(), LogLevel::Quiet);
        assert_eq!(
            rx.try_recv().unwrap().kind,
            HostEventKind::LogLevelChanged {
                level: LogLevel::Error
            }
        );
        assert_eq!(
            rx.try_recv().unwrap().kind,
            HostEventKind::LogLevelChanged {
                level: LogLevel::Quiet
            }
        );
    }
}
