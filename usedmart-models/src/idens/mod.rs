pub mod categories;
pub mod favorites;
pub mod messages;
pub mod orders;
pub mod permissions;
pub mod products;
pub mod profiles;
pub mod role_permissions;
pub mod roles;
pub mod system_settings;

const INIT_SYSTEM_ORDER: i32 = 0;
const INIT_SETTINGS_ORDER: i32 = INIT_SYSTEM_ORDER + 1;
const INIT_ROLE_ORDER: i32 = INIT_SETTINGS_ORDER + 1;
const INIT_PERMISSION_ORDER: i32 = INIT_ROLE_ORDER + 1;
const INIT_PROFILE_ORDER: i32 = INIT_PERMISSION_ORDER + 1;

const INIT_MARKET_ORDER: i32 = 100;
const INIT_CATEGORY_ORDER: i32 = INIT_MARKET_ORDER + 1;
const INIT_PRODUCT_ORDER: i32 = INIT_CATEGORY_ORDER + 1;
const INIT_ORDER_ORDER: i32 = INIT_PRODUCT_ORDER + 1;
const INIT_MESSAGE_ORDER: i32 = INIT_ORDER_ORDER + 1;
const INIT_FAVORITE_ORDER: i32 = INIT_MESSAGE_ORDER + 1;

const INIT_LATEST_ORDER: i32 = 10000;
const INIT_ROLE_PERMISSION_ORDER: i32 = INIT_LATEST_ORDER + 1;
