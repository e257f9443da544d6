use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// Returns a token that is cancelled on the first SIGINT or SIGTERM. A
/// second signal terminates the process.
pub fn shutdown_token() -> std::io::Result<CancellationToken> {
	let mut interrupt = signal(SignalKind::interrupt())?;
	let mut terminate = signal(SignalKind::terminate())?;

	let token = CancellationToken::new();
	let child = token.clone();

	tokio::spawn(async move {
		tokio::select! {
			_ = interrupt.recv() => {},
			_ = terminate.recv() => {},
		}

		tracing::info!("received signal, stopping the run");
		child.cancel();

		tokio::select! {
			_ = interrupt.recv() => {},
			_ = terminate.recv() => {},
		}

		tracing::warn!("received signal again, forcing exit");
		std::process::exit(130);
	});

	Ok(token)
}
