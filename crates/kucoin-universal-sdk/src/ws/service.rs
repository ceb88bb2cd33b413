/*
[INPUT]:  WebSocketTransport, subscription requests, typed user callbacks
[OUTPUT]: Subscription ids, message dispatch, resubscribe after reconnect
[POS]:    WebSocket layer - subscription service shared by all channel handles
[UPDATE]: When subscribe/unsubscribe or dispatch semantics change
*/

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::WebSocketClientOption;
use crate::http::{KucoinError, Result};
use crate::ws::message::{TYPE_SUBSCRIBE, TYPE_UNSUBSCRIBE, WebSocketEvent, WsMessage};
use crate::ws::token::WsTokenProvider;
use crate::ws::topic::{CallbackResult, MessageCallback, SubInfo, TopicManager, sub_topic};
use crate::ws::transport::{TransportEvent, WebSocketTransport};

/// Subscription service over one WebSocket connection
#[derive(Debug, Clone)]
pub struct DefaultWsService {
    inner: Arc<ServiceInner>,
}

#[derive(Debug)]
struct ServiceInner {
    transport: WebSocketTransport,
    topics: Mutex<TopicManager>,
    option: WebSocketClientOption,
    private: bool,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl DefaultWsService {
    pub fn new(
        token_provider: Arc<dyn WsTokenProvider>,
        option: WebSocketClientOption,
        private: bool,
    ) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                transport: WebSocketTransport::new(token_provider, option.clone()),
                topics: Mutex::new(TopicManager::default()),
                option,
                private,
                dispatcher: Mutex::new(None),
            }),
        }
    }

    pub fn is_private(&self) -> bool {
        self.inner.private
    }

    pub fn is_connected(&self) -> bool {
        self.inner.transport.is_connected()
    }

    pub async fn subscription_count(&self) -> usize {
        self.inner.topics.lock().await.subscription_count()
    }

    /// Connect and start dispatching pushed messages
    pub async fn start(&self) -> Result<()> {
        let (events_tx, events_rx) = mpsc::channel(self.inner.option.read_message_buffer.max(1));
        self.inner.transport.start(events_tx).await?;

        let inner = self.inner.clone();
        let handle = tokio::spawn(async move { inner.dispatch(events_rx).await });
        *self.inner.dispatcher.lock().await = Some(handle);

        info!(private = self.inner.private, "websocket service started");
        Ok(())
    }

    pub async fn stop(&self) -> Result<()> {
        self.inner.transport.stop().await?;

        let dispatcher = self.inner.dispatcher.lock().await.take();
        if let Some(mut handle) = dispatcher
            && tokio::time::timeout(self.inner.option.write_timeout, &mut handle)
                .await
                .is_err()
        {
            warn!("dispatcher did not drain in time, aborting");
            handle.abort();
        }

        info!(private = self.inner.private, "websocket service stopped");
        Ok(())
    }

    /// Subscribe with a raw callback receiving the full frame
    pub async fn subscribe(
        &self,
        prefix: &str,
        args: Vec<String>,
        callback: MessageCallback,
    ) -> Result<String> {
        self.inner
            .subscribe(SubInfo::new(prefix, args, callback))
            .await
    }

    /// Subscribe with a callback receiving `(topic, subject, data)`, data decoded as `T`
    pub async fn subscribe_typed<T, F>(
        &self,
        prefix: &str,
        args: Vec<String>,
        callback: F,
    ) -> Result<String>
    where
        T: DeserializeOwned + 'static,
        F: Fn(&str, &str, T) -> CallbackResult + Send + Sync + 'static,
    {
        let wrapped: MessageCallback = Arc::new(move |message: &WsMessage| -> CallbackResult {
            let data = message.data.clone().unwrap_or(Value::Null);
            let event: T = serde_json::from_value(data)?;
            callback(message.topic(), message.subject(), event)
        });
        self.subscribe(prefix, args, wrapped).await
    }

    pub async fn unsubscribe(&self, id: &str) -> Result<()> {
        self.inner.unsubscribe(id).await
    }
}

impl ServiceInner {
    async fn dispatch(self: Arc<Self>, mut events: mpsc::Receiver<TransportEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                TransportEvent::Message(message) => self.deliver(&message).await,
                TransportEvent::Reconnected => {
                    let inner = self.clone();
                    tokio::spawn(async move { inner.resubscribe().await });
                }
            }
        }
        debug!("websocket dispatcher stopped");
    }

    async fn deliver(&self, message: &WsMessage) {
        let callback = self.topics.lock().await.find_callback(message.topic());
        let Some(callback) = callback else {
            warn!(topic = message.topic(), "can not find callback manager");
            return;
        };

        let failure = match std::panic::catch_unwind(AssertUnwindSafe(|| callback(message))) {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err.to_string(),
            Err(_) => "callback panicked".to_string(),
        };
        warn!(topic = message.topic(), error = %failure, "message callback failed");
        self.option.notify(
            WebSocketEvent::CallbackError,
            &format!("{}: {failure}", message.topic()),
        );
    }

    async fn subscribe(&self, sub: SubInfo) -> Result<String> {
        let id = sub.id();
        let topic = sub.sub_topic();
        let prefix = sub.prefix.clone();

        if !self.topics.lock().await.callback_manager(&prefix).add(sub) {
            return Err(KucoinError::AlreadySubscribed(id));
        }

        let request = WsMessage::topic_request(TYPE_SUBSCRIBE, id.clone(), topic.clone(), self.private);
        if let Err(err) = self.transport.write(request, self.option.write_timeout).await {
            self.topics.lock().await.callback_manager(&prefix).remove(&id);
            warn!(id = %id, topic = %topic, error = %err, "subscribe failed");
            return Err(err);
        }

        info!(id = %id, topic = %topic, "subscribed");
        Ok(id)
    }

    async fn unsubscribe(&self, id: &str) -> Result<()> {
        let (prefix, args) = SubInfo::parse_id(id)?;
        let topic = sub_topic(&prefix, &args);

        let request = WsMessage::topic_request(
            TYPE_UNSUBSCRIBE,
            Uuid::new_v4().to_string(),
            topic.clone(),
            self.private,
        );
        self.transport.write(request, self.option.write_timeout).await?;

        self.topics.lock().await.callback_manager(&prefix).remove(id);
        info!(id = %id, topic = %topic, "unsubscribed");
        Ok(())
    }

    async fn resubscribe(self: Arc<Self>) {
        let subs = std::mem::take(&mut *self.topics.lock().await).sub_infos();
        let attempts = self.option.auto_resubscribe_max_attempts.max(1);
        info!(count = subs.len(), "resubscribing after reconnect");

        for sub in subs {
            let id = sub.id();
            let mut last_error = None;

            for attempt in 1..=attempts {
                match self.subscribe(sub.clone()).await {
                    Ok(_) | Err(KucoinError::AlreadySubscribed(_)) => {
                        last_error = None;
                        break;
                    }
                    Err(err) => {
                        warn!(id = %id, attempt, error = %err, "resubscribe failed");
                        last_error = Some(err);
                    }
                }
            }

            match last_error {
                None => self.option.notify(WebSocketEvent::ReSubscribeOk, &id),
                Some(err) => self
                    .option
                    .notify(WebSocketEvent::ReSubscribeError, &format!("{id}: {err}")),
            }
        }
    }
}
