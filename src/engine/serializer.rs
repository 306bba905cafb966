// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Single-writer queue in front of the tool.
//!
//! The module has one instance, one sandbox and one set of environment
//! files, so invocations must never overlap. A dedicated worker thread owns
//! the [`Invoker`] and drains an unbounded FIFO channel; callers get a
//! [`PendingResult`] backed by a one-shot reply channel.
//!
//! # Ordering
//!
//! [`Serializer::submit`] assigns the ticket and sends the request under one
//! lock, so ticket order is channel order is execution order. For calls
//! racing on different threads that order is whichever takes the lock first. No
//! priorities, no cancellation: a caller that drops its `PendingResult`
//! only stops listening, the invocation still runs.

use crate::bridge::CommandResult;
use crate::command::ParsedCommand;
use crate::engine::invocation::Invoker;
use crate::errors::BridgeError;
use crate::fs::VirtualFile;
use crate::observability::messages::bridge::{
    BridgeStarted, BridgeStopped, InvocationAbandoned, InvocationQueued,
};
use crate::observability::messages::StructuredLog;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};
use std::thread::JoinHandle;
use tokio::sync::{mpsc, oneshot};

const WORKER_THREAD_NAME: &str = "openssl-bridge-worker";

struct Request {
    ticket: u64,
    command: ParsedCommand,
    inputs: Vec<VirtualFile>,
    reply: oneshot::Sender<CommandResult>,
}

pub struct Serializer {
    sender: Option<mpsc::UnboundedSender<Request>>,
    worker: Option<JoinHandle<()>>,
    next_ticket: Mutex<u64>,
}

impl Serializer {
    /// Moves `invoker` onto a new worker thread and starts accepting requests.
    pub fn spawn(invoker: Invoker) -> Result<Self, BridgeError> {
        let (sender, receiver) = mpsc::unbounded_channel();

        let worker = std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || worker_loop(invoker, receiver))
            .map_err(|e| BridgeError::Startup(format!("Failed to spawn worker thread: {}", e)))?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
            next_ticket: Mutex::new(1),
        })
    }

    /// Enqueues a command. The returned future resolves once it has run.
    pub fn submit(
        &self,
        command: ParsedCommand,
        inputs: Vec<VirtualFile>,
    ) -> Result<PendingResult, BridgeError> {
        let sender = self.sender.as_ref().ok_or(BridgeError::Unavailable)?;
        let (reply, receiver) = oneshot::channel();

        // Held until the request is on the channel.
        let mut next_ticket = self.next_ticket.lock().unwrap_or_else(PoisonError::into_inner);
        let ticket = *next_ticket;

        InvocationQueued {
            ticket,
            subcommand: &command.subcommand,
        }
        .log();

        sender
            .send(Request {
                ticket,
                command,
                inputs,
                reply,
            })
            .map_err(|_| BridgeError::Unavailable)?;
        *next_ticket += 1;

        Ok(PendingResult { ticket, receiver })
    }

    /// Stops accepting requests, lets the queue drain, and joins the worker.
    pub fn shutdown(mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("Command bridge worker thread panicked");
            }
        }
    }
}

impl Drop for Serializer {
    /// Closes the queue without blocking; queued requests still run.
    fn drop(&mut self) {
        self.sender.take();
    }
}

fn worker_loop(mut invoker: Invoker, mut receiver: mpsc::UnboundedReceiver<Request>) {
    tracing::info!(
        "{}",
        BridgeStarted {
            runtime: invoker.runtime_type(),
            program: invoker.program(),
        }
    );

    let mut completed_invocations = 0u64;
    while let Some(request) = receiver.blocking_recv() {
        let result = invoker.run(request.ticket, &request.command, &request.inputs);
        completed_invocations += 1;

        if request.reply.send(result).is_err() {
            tracing::debug!("{}", InvocationAbandoned { ticket: request.ticket });
        }
    }

    tracing::info!("{}", BridgeStopped { completed_invocations });
}

/// A queued command's eventual result.
///
/// Resolves to `Err(BridgeError::Unavailable)` if the worker went away
/// before answering.
#[must_use = "a PendingResult does nothing unless awaited; the command runs regardless"]
pub struct PendingResult {
    ticket: u64,
    receiver: oneshot::Receiver<CommandResult>,
}

impl PendingResult {
    /// Position in the queue; a higher ticket always runs later.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }
}

impl Future for PendingResult {
    type Output = Result<CommandResult, BridgeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.map_err(|_| BridgeError::Unavailable))
    }
}
