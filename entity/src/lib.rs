pub mod access_token;
pub mod group;
pub mod group_member;
pub mod resource_permission;
pub mod user;

/*
 A user owns a profile and any number of access tokens. Tokens are what the web
 layer authenticates with; the newest one is the one shown on the profile page.
 Groups only exist to decide which users a caller can see in search:
 public group members are visible to everyone, private group members only to
 fellow members.
 */
