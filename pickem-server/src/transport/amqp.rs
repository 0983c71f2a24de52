//! AMQP transport adapter.
//!
//! Declares a durable fanout exchange and durable queue per binding,
//! binds them, and consumes each queue on its own task. Every delivery
//! goes through the dispatcher and is acknowledged only after the
//! dispatcher returns, whatever the outcome. Redelivery happens only
//! when the process dies mid-handler, which the delete-then-insert
//! protocol tolerates.

use crate::config::file::TransportConfig;
use futures_util::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, ExchangeDeclareOptions, QueueBindOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{Channel, Connection, ConnectionProperties, Consumer, ExchangeKind};
use pickem_core::ingest::Dispatcher;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Errors raised while setting up or tearing down the bus connection.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("AMQP error: {0}")]
    Amqp(#[from] lapin::Error),
}

/// Connect, bind every configured queue and consume until shutdown.
///
/// Resolves once all consumer tasks have drained and the connection is
/// closed.
pub async fn run(
    config: TransportConfig,
    dispatcher: Arc<Dispatcher>,
    shutdown_rx: watch::Receiver<bool>,
) -> Result<(), TransportError> {
    let connection = Connection::connect(&config.url, ConnectionProperties::default()).await?;
    let channel = connection.create_channel().await?;
    info!(url = %config.url, "connected to message bus");

    let mut tasks = Vec::with_capacity(config.bindings.len());
    for binding in &config.bindings {
        let consumer = bind_and_consume(&channel, &binding.exchange, &binding.queue).await?;
        tasks.push(tokio::spawn(consume_loop(
            consumer,
            binding.exchange.clone(),
            Arc::clone(&dispatcher),
            shutdown_rx.clone(),
        )));
    }

    for task in tasks {
        if let Err(err) = task.await {
            error!(error = %err, "consumer task aborted");
        }
    }

    connection.close(200, "shutting down").await?;
    info!("message bus connection closed");
    Ok(())
}

/// Declare the exchange and queue, bind them, and start a consumer.
async fn bind_and_consume(
    channel: &Channel,
    exchange: &str,
    queue: &str,
) -> Result<Consumer, TransportError> {
    channel
        .exchange_declare(
            exchange,
            ExchangeKind::Fanout,
            ExchangeDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    channel
        .queue_bind(
            queue,
            exchange,
            "",
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await?;

    let consumer = channel
        .basic_consume(
            queue,
            &format!("display-{queue}"),
            BasicConsumeOptions::default(),
            FieldTable::default(),
        )
        .await?;

    info!(exchange, queue, "bound queue to exchange");
    Ok(consumer)
}

/// Consume one queue until shutdown or stream end.
async fn consume_loop(
    mut consumer: Consumer,
    exchange: String,
    dispatcher: Arc<Dispatcher>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;

            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    info!(exchange, "consumer received shutdown signal");
                    break;
                }
            }

            delivery = consumer.next() => {
                match delivery {
                    Some(Ok(delivery)) => {
                        // Fall back to the configured exchange when the
                        // broker omits the delivery exchange.
                        let delivery_exchange = if delivery.exchange.as_str().is_empty() {
                            exchange.as_str()
                        } else {
                            delivery.exchange.as_str()
                        };

                        let result = dispatcher
                            .dispatch(delivery_exchange, &delivery.data)
                            .await;
                        if !result.is_success() {
                            warn!(exchange = delivery_exchange, ?result, "delivery not processed");
                        }

                        // Acknowledge only after the handler has returned.
                        if let Err(err) = delivery.ack(BasicAckOptions::default()).await {
                            error!(exchange, error = %err, "failed to acknowledge delivery");
                        }
                    }
                    Some(Err(err)) => {
                        error!(exchange, error = %err, "consumer stream error");
                    }
                    None => {
                        info!(exchange, "consumer stream closed");
                        break;
                    }
                }
            }
        }
    }
}
