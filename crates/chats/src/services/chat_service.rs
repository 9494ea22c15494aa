//! Chat service for managing chat operations.

use huddle_auth::Account;
use huddle_database::NewChat;
use tracing::{error, info, warn};

use crate::ports::{AuthProvider, ChatStore};
use crate::types::{
    ChatError, ChatListResponse, ChatResult, CreateChatRequest, CreateChatResponse,
    DeleteChatResponse, MemberListResponse, StoreError,
};
use crate::utils::{PermissionChecker, Validator};

/// The chat rules, generic over where chats live and who vouches for tokens.
pub struct ChatService<S, A> {
    store: S,
    auth: A,
}

impl<S, A> ChatService<S, A>
where
    S: ChatStore,
    A: AuthProvider,
{
    pub fn new(store: S, auth: A) -> Self {
        Self { store, auth }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a bearer token to the calling account.
    pub async fn authenticate(&self, token: &str) -> ChatResult<Account> {
        self.auth.verify_token(token).await.map_err(|err| {
            if err.is_internal() {
                error!(error = %err, "token verification failed");
            }
            ChatError::from(err)
        })
    }

    /// Create a chat owned by `account` with the listed members.
    ///
    /// All input is validated before the store is touched; the chat and its
    /// roster are then written in one atomic store call.
    pub async fn create_chat(
        &self,
        account: &Account,
        request: CreateChatRequest,
    ) -> ChatResult<CreateChatResponse> {
        let name = Validator::chat_name(request.name.as_deref())?;
        let member_ids = Validator::member_ids(request.members_list.as_deref())?;
        let member_ids = Validator::member_set(account.id, &member_ids);

        let new_chat = NewChat {
            name,
            admin_id: account.id,
            member_ids,
        };

        let chat = self
            .store
            .create_chat_with_members(new_chat)
            .await
            .map_err(|err| {
                error!(admin_id = account.id, error = %err, "chat creation failed");
                match err {
                    StoreError::MemberInsert(_) => ChatError::store("member creation failed"),
                    StoreError::ChatInsert(_) | StoreError::Backend(_) => {
                        ChatError::store("chat creation failed")
                    }
                }
            })?;

        info!(chat_id = chat.id, admin_id = chat.admin_id, "chat created");

        Ok(CreateChatResponse {
            chat_id: chat.id,
            name: chat.name,
        })
    }

    /// Every chat `account` is a member of, oldest first.
    pub async fn list_chats(&self, account: &Account) -> ChatResult<ChatListResponse> {
        let chats = self
            .store
            .chats_for_account(account.id)
            .await
            .map_err(|err| {
                error!(account_id = account.id, error = %err, "chat listing failed");
                ChatError::store("chat listing failed")
            })?;

        Ok(ChatListResponse { chats })
    }

    /// Delete a chat. Only its admin may do this; memberships go with it.
    pub async fn delete_chat(
        &self,
        account: &Account,
        chat_id: i64,
    ) -> ChatResult<DeleteChatResponse> {
        let chat = self
            .store
            .find_chat(chat_id)
            .await
            .map_err(|err| {
                error!(chat_id, error = %err, "chat lookup failed");
                ChatError::store("chat deletion failed")
            })?
            .ok_or(ChatError::not_found(chat_id))?;

        if let Err(err) = PermissionChecker::can_delete_chat(&chat, account.id) {
            warn!(chat_id, account_id = account.id, "rejected chat deletion by non-admin");
            return Err(err);
        }

        let deleted = self.store.delete_chat(chat_id).await.map_err(|err| {
            error!(chat_id, error = %err, "chat deletion failed");
            ChatError::store("chat deletion failed")
        })?;

        // lost a race with another delete of the same chat
        if !deleted {
            return Err(ChatError::not_found(chat_id));
        }

        info!(chat_id, admin_id = account.id, "chat deleted");
        Ok(DeleteChatResponse {})
    }

    /// Roster of a chat, visible to its members only.
    pub async fn list_members(
        &self,
        account: &Account,
        chat_id: i64,
    ) -> ChatResult<MemberListResponse> {
        let lookup_failed = |err: StoreError| {
            error!(chat_id, error = %err, "member listing failed");
            ChatError::store("member listing failed")
        };

        self.store
            .find_chat(chat_id)
            .await
            .map_err(lookup_failed)?
            .ok_or(ChatError::not_found(chat_id))?;

        let members = self.store.members(chat_id).await.map_err(lookup_failed)?;
        // a live chat always holds its admin row; none left means a delete won
        if members.is_empty() {
            return Err(ChatError::not_found(chat_id));
        }
        PermissionChecker::can_view_members(&members, account.id)?;

        Ok(MemberListResponse { members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryAuthProvider, InMemoryChatStore};
    use huddle_auth::AuthError;
    use huddle_database::{Chat, ChatMember, MemberRole};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn account(id: i64) -> Account {
        Account {
            id,
            public_id: format!("account-{id}"),
            display_name: None,
        }
    }

    fn service() -> ChatService<InMemoryChatStore, InMemoryAuthProvider> {
        let auth = InMemoryAuthProvider::new()
            .with_account("token-1", 1)
            .with_account("token-2", 2);
        ChatService::new(InMemoryChatStore::new(), auth)
    }

    async fn member_ids(
        service: &ChatService<InMemoryChatStore, InMemoryAuthProvider>,
        chat_id: i64,
    ) -> Vec<i64> {
        service
            .store()
            .members(chat_id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.account_id)
            .collect()
    }

    /// Counts writes so tests can assert validation happens first.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryChatStore,
        writes: AtomicUsize,
    }

    impl ChatStore for CountingStore {
        async fn create_chat_with_members(&self, new_chat: NewChat) -> crate::StoreResult<Chat> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.create_chat_with_members(new_chat).await
        }

        async fn chats_for_account(&self, account_id: i64) -> crate::StoreResult<Vec<Chat>> {
            self.inner.chats_for_account(account_id).await
        }

        async fn find_chat(&self, chat_id: i64) -> crate::StoreResult<Option<Chat>> {
            self.inner.find_chat(chat_id).await
        }

        async fn delete_chat(&self, chat_id: i64) -> crate::StoreResult<bool> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_chat(chat_id).await
        }

        async fn members(&self, chat_id: i64) -> crate::StoreResult<Vec<ChatMember>> {
            self.inner.members(chat_id).await
        }
    }

    /// Fails every call, standing in for an unreachable database.
    struct BrokenStore;

    impl ChatStore for BrokenStore {
        async fn create_chat_with_members(&self, _: NewChat) -> crate::StoreResult<Chat> {
            Err(StoreError::Backend("disk I/O error".into()))
        }

        async fn chats_for_account(&self, _: i64) -> crate::StoreResult<Vec<Chat>> {
            Err(StoreError::Backend("disk I/O error".into()))
        }

        async fn find_chat(&self, _: i64) -> crate::StoreResult<Option<Chat>> {
            Err(StoreError::Backend("disk I/O error".into()))
        }

        async fn delete_chat(&self, _: i64) -> crate::StoreResult<bool> {
            Err(StoreError::Backend("disk I/O error".into()))
        }

        async fn members(&self, _: i64) -> crate::StoreResult<Vec<ChatMember>> {
            Err(StoreError::Backend("disk I/O error".into()))
        }
    }

    /// Deletes the chat right after it has been looked up, the way a
    /// concurrent delete committing between the two reads would.
    struct DeletedAfterLookup {
        inner: InMemoryChatStore,
    }

    impl ChatStore for DeletedAfterLookup {
        async fn create_chat_with_members(&self, new_chat: NewChat) -> crate::StoreResult<Chat> {
            self.inner.create_chat_with_members(new_chat).await
        }

        async fn chats_for_account(&self, account_id: i64) -> crate::StoreResult<Vec<Chat>> {
            self.inner.chats_for_account(account_id).await
        }

        async fn find_chat(&self, chat_id: i64) -> crate::StoreResult<Option<Chat>> {
            let found = self.inner.find_chat(chat_id).await?;
            self.inner.delete_chat(chat_id).await?;
            Ok(found)
        }

        async fn delete_chat(&self, chat_id: i64) -> crate::StoreResult<bool> {
            self.inner.delete_chat(chat_id).await
        }

        async fn members(&self, chat_id: i64) -> crate::StoreResult<Vec<ChatMember>> {
            self.inner.members(chat_id).await
        }
    }

    #[tokio::test]
    async fn authenticate_resolves_known_tokens() {
        let service = service();

        assert_eq!(service.authenticate("token-2").await.unwrap().id, 2);
        assert!(matches!(
            service.authenticate("bogus").await,
            Err(ChatError::Authentication(AuthError::SessionNotFound))
        ));
    }

    #[tokio::test]
    async fn create_chat_records_admin_and_members() {
        let service = service();

        let created = service
            .create_chat(&account(1), CreateChatRequest::new("Team", "[2,3]"))
            .await
            .unwrap();
        assert_eq!(created.name, "Team");

        let chat = service.store().find_chat(created.chat_id).await.unwrap().unwrap();
        assert_eq!(chat.admin_id, 1);
        assert_eq!(member_ids(&service, created.chat_id).await, vec![1, 2, 3]);

        let roles: Vec<_> = service
            .store()
            .members(created.chat_id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(roles, vec![MemberRole::Admin, MemberRole::Member, MemberRole::Member]);
    }

    #[tokio::test]
    async fn create_chat_deduplicates_roster() {
        let service = service();

        let created = service
            .create_chat(&account(1), CreateChatRequest::new("Team", r#"[2, "2", 1, 3, 2]"#))
            .await
            .unwrap();

        assert_eq!(member_ids(&service, created.chat_id).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn create_chat_accepts_empty_member_list() {
        let service = service();

        let created = service
            .create_chat(&account(1), CreateChatRequest::new("Solo", "[]"))
            .await
            .unwrap();

        assert_eq!(member_ids(&service, created.chat_id).await, vec![1]);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_store() {
        let store = CountingStore::default();
        let service = ChatService::new(store, InMemoryAuthProvider::new());

        let cases = [
            (CreateChatRequest { name: None, members_list: Some("[2]".into()) }, "name required"),
            (CreateChatRequest::new("   ", "[2]"), "name required"),
            (CreateChatRequest { name: Some("Team".into()), members_list: None }, "memberIds required"),
            (CreateChatRequest::new("Team", "not json"), "memberIds malformed"),
            (CreateChatRequest::new("Team", "[\"x\"]"), "memberIds malformed"),
            (CreateChatRequest::new("x".repeat(256), "[2]"), "name too long"),
        ];

        for (request, expected) in cases {
            match service.create_chat(&account(1), request).await {
                Err(ChatError::Validation { message }) => assert_eq!(message, expected),
                other => panic!("expected validation error, got {other:?}"),
            }
        }

        assert_eq!(service.store().writes.load(Ordering::SeqCst), 0);
        assert_eq!(service.store().inner.chat_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_member_reports_member_creation_failure() {
        let service = ChatService::new(
            InMemoryChatStore::with_accounts([1, 2]),
            InMemoryAuthProvider::new(),
        );

        let err = service
            .create_chat(&account(1), CreateChatRequest::new("Team", "[2, 99]"))
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Store { ref message } if message == "member creation failed"));
        assert_eq!(service.store().chat_count().await, 0);
    }

    #[tokio::test]
    async fn store_failures_surface_as_store_errors() {
        let service = ChatService::new(BrokenStore, InMemoryAuthProvider::new());

        let create = service
            .create_chat(&account(1), CreateChatRequest::new("Team", "[]"))
            .await
            .unwrap_err();
        assert_eq!(create.to_string(), "chat creation failed");

        let list = service.list_chats(&account(1)).await.unwrap_err();
        assert_eq!(list.to_string(), "chat listing failed");

        let delete = service.delete_chat(&account(1), 1).await.unwrap_err();
        assert_eq!(delete.to_string(), "chat deletion failed");

        let members = service.list_members(&account(1), 1).await.unwrap_err();
        assert_eq!(members.to_string(), "member listing failed");
    }

    #[tokio::test]
    async fn list_chats_follows_membership() {
        let service = service();

        let first = service
            .create_chat(&account(1), CreateChatRequest::new("Team", "[2,3]"))
            .await
            .unwrap();
        let second = service
            .create_chat(&account(2), CreateChatRequest::new("Pair", "[1]"))
            .await
            .unwrap();

        let ids = |list: ChatListResponse| list.chats.into_iter().map(|c| c.id).collect::<Vec<_>>();

        assert_eq!(
            ids(service.list_chats(&account(1)).await.unwrap()),
            vec![first.chat_id, second.chat_id]
        );
        assert_eq!(ids(service.list_chats(&account(3)).await.unwrap()), vec![first.chat_id]);
        assert!(service.list_chats(&account(4)).await.unwrap().chats.is_empty());
    }

    #[tokio::test]
    async fn non_admin_cannot_delete() {
        let service = service();
        let created = service
            .create_chat(&account(1), CreateChatRequest::new("Team", "[2,3]"))
            .await
            .unwrap();

        let err = service.delete_chat(&account(2), created.chat_id).await.unwrap_err();
        assert!(matches!(err, ChatError::Forbidden { .. }));

        assert!(service.store().find_chat(created.chat_id).await.unwrap().is_some());
        assert_eq!(member_ids(&service, created.chat_id).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn admin_delete_removes_chat_for_everyone() {
        let service = service();
        let created = service
            .create_chat(&account(1), CreateChatRequest::new("Team", "[2,3]"))
            .await
            .unwrap();

        let response = service.delete_chat(&account(1), created.chat_id).await.unwrap();
        assert_eq!(response, DeleteChatResponse {});

        for id in 1..=3 {
            assert!(service.list_chats(&account(id)).await.unwrap().chats.is_empty());
        }

        let again = service.delete_chat(&account(1), created.chat_id).await.unwrap_err();
        assert!(matches!(again, ChatError::NotFound { id } if id == created.chat_id));
    }

    #[tokio::test]
    async fn delete_of_unknown_chat_is_not_found() {
        let service = service();

        let err = service.delete_chat(&account(1), 404).await.unwrap_err();
        assert!(matches!(err, ChatError::NotFound { id: 404 }));
    }

    #[tokio::test]
    async fn concurrent_deletes_succeed_exactly_once() {
        let service = Arc::new(service());
        let created = service
            .create_chat(&account(1), CreateChatRequest::new("Team", "[2]"))
            .await
            .unwrap();
        let chat_id = created.chat_id;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.delete_chat(&account(1), chat_id).await })
            })
            .collect();

        let mut ok = 0;
        let mut not_found = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(ChatError::NotFound { .. }) => not_found += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(not_found, 7);
    }

    #[tokio::test]
    async fn members_are_visible_to_members_only() {
        let service = service();
        let created = service
            .create_chat(&account(1), CreateChatRequest::new("Team", "[2]"))
            .await
            .unwrap();

        let roster = service.list_members(&account(2), created.chat_id).await.unwrap();
        let ids: Vec<_> = roster.members.iter().map(|m| m.account_id).collect();
        assert_eq!(ids, vec![1, 2]);

        let err = service.list_members(&account(3), created.chat_id).await.unwrap_err();
        assert!(matches!(err, ChatError::Forbidden { .. }));

        let err = service.list_members(&account(1), 999).await.unwrap_err();
        assert!(matches!(err, ChatError::NotFound { id: 999 }));
    }

    #[tokio::test]
    async fn members_of_a_chat_deleted_mid_lookup_are_not_found() {
        let store = DeletedAfterLookup {
            inner: InMemoryChatStore::new(),
        };
        let service = ChatService::new(store, InMemoryAuthProvider::new());
        let created = service
            .create_chat(&account(1), CreateChatRequest::new("Team", "[2]"))
            .await
            .unwrap();

        let err = service
            .list_members(&account(2), created.chat_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::NotFound { id } if id == created.chat_id));
    }

    #[tokio::test]
    async fn worked_example() {
        let service = service();

        let created = service
            .create_chat(&account(1), CreateChatRequest::new("Team", "[2,3]"))
            .await
            .unwrap();
        assert_eq!(created.name, "Team");
        assert_eq!(member_ids(&service, created.chat_id).await, vec![1, 2, 3]);

        assert!(matches!(
            service.delete_chat(&account(2), created.chat_id).await,
            Err(ChatError::Forbidden { .. })
        ));
        assert_eq!(
            service.delete_chat(&account(1), created.chat_id).await.unwrap(),
            DeleteChatResponse {}
        );
        assert!(service.list_chats(&account(3)).await.unwrap().chats.is_empty());
    }
}
