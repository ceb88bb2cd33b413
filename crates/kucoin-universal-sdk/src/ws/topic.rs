/*
[INPUT]:  Topic prefixes, symbol args, message callbacks
[OUTPUT]: Subscription ids and topic -> callback routing tables
[POS]:    WebSocket layer - subscription registry
[UPDATE]: When subscription identity or routing rules change
*/

use std::collections::HashMap;
use std::sync::Arc;

use crate::http::{KucoinError, Result};
use crate::ws::message::WsMessage;

const ID_SEPARATOR: &str = "@@";
const EMPTY_ARGS: &str = "EMPTY_ARGS";

/// Error type user callbacks may return
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;
pub type CallbackResult = std::result::Result<(), CallbackError>;

/// Untyped callback invoked with the full `message` frame
pub type MessageCallback = Arc<dyn Fn(&WsMessage) -> CallbackResult + Send + Sync>;

/// One subscription: topic prefix, symbol args and its callback
#[derive(Clone)]
pub struct SubInfo {
    pub prefix: String,
    pub args: Vec<String>,
    pub callback: MessageCallback,
}

impl std::fmt::Debug for SubInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubInfo")
            .field("prefix", &self.prefix)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl SubInfo {
    pub fn new(prefix: impl Into<String>, args: Vec<String>, callback: MessageCallback) -> Self {
        Self {
            prefix: prefix.into(),
            args,
            callback,
        }
    }

    /// `prefix@@a,b` with args sorted, or `prefix@@EMPTY_ARGS`
    pub fn id(&self) -> String {
        if self.args.is_empty() {
            return format!("{}{ID_SEPARATOR}{EMPTY_ARGS}", self.prefix);
        }
        let mut args = self.args.clone();
        args.sort();
        format!("{}{ID_SEPARATOR}{}", self.prefix, args.join(","))
    }

    /// Inverse of [`SubInfo::id`]: prefix and args
    pub fn parse_id(id: &str) -> Result<(String, Vec<String>)> {
        let (prefix, args) = id
            .split_once(ID_SEPARATOR)
            .filter(|(prefix, args)| !prefix.is_empty() && !args.is_empty())
            .ok_or_else(|| KucoinError::InvalidSubscriptionId(id.to_string()))?;

        let args = if args == EMPTY_ARGS {
            Vec::new()
        } else {
            args.split(',').map(str::to_string).collect()
        };
        Ok((prefix.to_string(), args))
    }

    /// Topic sent in the subscribe frame
    pub fn sub_topic(&self) -> String {
        sub_topic(&self.prefix, &self.args)
    }

    /// Topics pushed back by the server for this subscription
    pub fn topics(&self) -> Vec<String> {
        if self.args.is_empty() {
            return vec![self.prefix.clone()];
        }
        self.args
            .iter()
            .map(|arg| format!("{}:{}", self.prefix, arg))
            .collect()
    }
}

pub fn sub_topic(prefix: &str, args: &[String]) -> String {
    if args.is_empty() {
        prefix.to_string()
    } else {
        format!("{}:{}", prefix, args.join(","))
    }
}

/// Subscriptions sharing one topic prefix
#[derive(Default)]
pub struct CallbackManager {
    subs: HashMap<String, SubInfo>,
    topic_callbacks: HashMap<String, MessageCallback>,
}

impl std::fmt::Debug for CallbackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackManager")
            .field("subs", &self.subs)
            .field("topics", &self.topic_callbacks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CallbackManager {
    /// Register `sub`; false when its id is already present.
    ///
    /// A topic already served by another subscription keeps its first callback.
    pub fn add(&mut self, sub: SubInfo) -> bool {
        let id = sub.id();
        if self.subs.contains_key(&id) {
            return false;
        }
        for topic in sub.topics() {
            self.topic_callbacks
                .entry(topic)
                .or_insert_with(|| sub.callback.clone());
        }
        self.subs.insert(id, sub);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<SubInfo> {
        let sub = self.subs.remove(id)?;
        for topic in sub.topics() {
            self.topic_callbacks.remove(&topic);
        }
        Some(sub)
    }

    pub fn get(&self, topic: &str) -> Option<MessageCallback> {
        self.topic_callbacks.get(topic).cloned()
    }

    pub fn sub_infos(&self) -> impl Iterator<Item = &SubInfo> {
        self.subs.values()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}

/// Callback managers keyed by topic prefix
#[derive(Debug, Default)]
pub struct TopicManager {
    managers: HashMap<String, CallbackManager>,
}

impl TopicManager {
    /// Routing key: the part before `:`, unless the suffix is `all`
    pub fn key_for(topic: &str) -> &str {
        match topic.split_once(':') {
            Some((prefix, suffix)) if suffix != "all" => prefix,
            _ => topic,
        }
    }

    pub fn callback_manager(&mut self, topic: &str) -> &mut CallbackManager {
        self.managers
            .entry(Self::key_for(topic).to_string())
            .or_default()
    }

    /// Callback registered for an incoming topic
    pub fn find_callback(&self, topic: &str) -> Option<MessageCallback> {
        self.managers
            .get(Self::key_for(topic))
            .and_then(|manager| manager.get(topic))
    }

    pub fn sub_infos(&self) -> Vec<SubInfo> {
        self.managers
            .values()
            .flat_map(|manager| manager.sub_infos().cloned())
            .collect()
    }

    pub fn subscription_count(&self) -> usize {
        self.managers.values().map(|m| m.subs.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop() -> MessageCallback {
        Arc::new(|_: &WsMessage| -> CallbackResult { Ok(()) })
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_id_sorts_args() {
        let sub = SubInfo::new("/market/ticker", args(&["ETH-USDT", "BTC-USDT"]), noop());
        assert_eq!(sub.id(), "/market/ticker@@BTC-USDT,ETH-USDT");
        assert_eq!(sub.sub_topic(), "/market/ticker:ETH-USDT,BTC-USDT");
        assert_eq!(
            sub.topics(),
            vec!["/market/ticker:ETH-USDT", "/market/ticker:BTC-USDT"]
        );
    }

    #[test]
    fn test_empty_args() {
        let sub = SubInfo::new("/account/balance", Vec::new(), noop());
        assert_eq!(sub.id(), "/account/balance@@EMPTY_ARGS");
        assert_eq!(sub.sub_topic(), "/account/balance");
        assert_eq!(sub.topics(), vec!["/account/balance"]);

        let (prefix, parsed) = SubInfo::parse_id(&sub.id()).unwrap();
        assert_eq!(prefix, "/account/balance");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_parse_id_with_args() {
        let (prefix, parsed) = SubInfo::parse_id("/market/match@@BTC-USDT,ETH-USDT").unwrap();
        assert_eq!(prefix, "/market/match");
        assert_eq!(parsed, args(&["BTC-USDT", "ETH-USDT"]));
    }

    #[rstest]
    #[case("")]
    #[case("no-separator")]
    #[case("@@BTC-USDT")]
    #[case("/market/ticker@@")]
    fn test_parse_id_rejects(#[case] id: &str) {
        assert!(matches!(
            SubInfo::parse_id(id),
            Err(KucoinError::InvalidSubscriptionId(_))
        ));
    }

    #[rstest]
    #[case("/market/ticker:BTC-USDT", "/market/ticker")]
    #[case("/market/ticker:all", "/market/ticker:all")]
    #[case("/account/balance", "/account/balance")]
    #[case("/contractMarket/tickerV2:XBTUSDTM", "/contractMarket/tickerV2")]
    fn test_routing_key(#[case] topic: &str, #[case] key: &str) {
        assert_eq!(TopicManager::key_for(topic), key);
    }

    #[test]
    fn test_callback_manager_rejects_duplicates() {
        let mut manager = CallbackManager::default();
        assert!(manager.add(SubInfo::new("/market/ticker", args(&["A", "B"]), noop())));
        assert!(!manager.add(SubInfo::new("/market/ticker", args(&["B", "A"]), noop())));
        assert!(manager.get("/market/ticker:A").is_some());

        let removed = manager.remove("/market/ticker@@A,B").unwrap();
        assert_eq!(removed.prefix, "/market/ticker");
        assert!(manager.get("/market/ticker:A").is_none());
        assert!(manager.is_empty());
        assert!(manager.remove("/market/ticker@@A,B").is_none());
    }

    #[test]
    fn test_overlapping_topic_keeps_first_callback() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let (a, b) = (first.clone(), second.clone());

        let mut manager = CallbackManager::default();
        assert!(manager.add(SubInfo::new(
            "/market/ticker",
            args(&["BTC-USDT"]),
            Arc::new(move |_: &WsMessage| -> CallbackResult {
                a.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )));
        assert!(manager.add(SubInfo::new(
            "/market/ticker",
            args(&["BTC-USDT", "ETH-USDT"]),
            Arc::new(move |_: &WsMessage| -> CallbackResult {
                b.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        )));

        let message = WsMessage::default();
        let callback = manager.get("/market/ticker:BTC-USDT").unwrap();
        callback(&message).unwrap();
        let callback = manager.get("/market/ticker:ETH-USDT").unwrap();
        callback(&message).unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_topic_manager_routes_messages() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let callback: MessageCallback = Arc::new(move |_: &WsMessage| -> CallbackResult {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let mut topics = TopicManager::default();
        topics
            .callback_manager("/market/ticker")
            .add(SubInfo::new("/market/ticker", args(&["BTC-USDT"]), callback));
        topics
            .callback_manager("/market/ticker:all")
            .add(SubInfo::new("/market/ticker:all", Vec::new(), noop()));

        let found = topics.find_callback("/market/ticker:BTC-USDT").unwrap();
        found(&WsMessage::default()).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(topics.find_callback("/market/ticker:all").is_some());
        assert!(topics.find_callback("/market/ticker:ETH-USDT").is_none());
        assert!(topics.find_callback("/market/match:BTC-USDT").is_none());
        assert_eq!(topics.subscription_count(), 2);
        assert_eq!(topics.sub_infos().len(), 2);
    }
}
