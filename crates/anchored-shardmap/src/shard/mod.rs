mod list;
mod node;


pub(crate) use self::list::ShardSkiplist;
