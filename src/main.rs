use replterm::config::Config;
use replterm::error::TermError;
use replterm::platform::{App, UserEvent};
use winit::event_loop::EventLoop;

fn main() -> Result<(), TermError> {
    env_logger::init();

    let config = Config::load();
    let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
    let mut app = App::new(config, event_loop.create_proxy())?;
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
